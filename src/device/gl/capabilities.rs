use std::cmp;
use std::ffi;

use ::gl;
use ::gl::types::*;

use crate::errors::*;

/// Describes the OpenGL context profile.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Profile {
    /// The context uses only future-compatible functions and definitions.
    Core,
    /// The context includes all immediate mode functions and definitions.
    Compatibility,
}

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the same API.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    /// Regular OpenGL.
    GL(u8, u8),
    /// OpenGL embedded system.
    ES(u8, u8),
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        match (*self, *other) {
            (Version::GL(a, b), Version::GL(c, d)) | (Version::ES(a, b), Version::ES(c, d)) => {
                Some((a, b).cmp(&(c, d)))
            }
            _ => None,
        }
    }
}

impl Version {
    /// Parses a `GL_VERSION` string, e.g. `4.5.0 NVIDIA 390.77` or `OpenGL ES 3.2 Mesa`.
    pub fn parse_str(desc: &str) -> Result<Version> {
        let (es, desc) = if desc.starts_with("OpenGL ES ") {
            (true, &desc[10..])
        } else if desc.starts_with("OpenGL ES-") {
            (true, &desc[13..])
        } else {
            (false, desc)
        };

        let desc = desc
            .split(' ')
            .next()
            .ok_or_else(|| format_err!("[GL] Version string {} is malformed.", desc))?;

        let mut iter = desc.split('.').map(|v| v.parse::<u8>());
        match (iter.next(), iter.next()) {
            (Some(Ok(major)), Some(Ok(minor))) => {
                if es {
                    Ok(Version::ES(major, minor))
                } else {
                    Ok(Version::GL(major, minor))
                }
            }
            _ => Err(Error::Device(format!("[GL] Version string {} is malformed.", desc))),
        }
    }

    /// Obtains the OpenGL version of the current context using the loaded functions.
    ///
    /// # Unsafe
    ///
    /// You must ensure that the functions belong to the current context, otherwise you will get
    /// an undefined behavior.
    pub unsafe fn parse() -> Result<Version> {
        Version::parse_str(&parse_str(gl::VERSION)?)
    }
}

macro_rules! extensions {
    ($($string:expr => $field:ident,)+) => {
        /// Contains data about the list of extensions.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct Extensions {
            $(
                pub $field: bool,
            )+
        }

        impl Extensions {
            /// Returns the list of extensions supported by the current context.
            ///
            /// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
            pub unsafe fn parse(version: Version) -> Result<Extensions> {
                let strings: Vec<String> = if version >= Version::GL(3, 0) || version >= Version::ES(3, 0) {
                    let mut num_extensions = 0;
                    gl::GetIntegerv(gl::NUM_EXTENSIONS, &mut num_extensions);

                    let mut strings = Vec::with_capacity(num_extensions as usize);
                    for i in 0..num_extensions {
                        let ext = gl::GetStringi(gl::EXTENSIONS, i as GLuint);
                        if !ext.is_null() {
                            let ext = ffi::CStr::from_ptr(ext as *const _);
                            strings.push(ext.to_string_lossy().into_owned());
                        }
                    }

                    strings
                } else {
                    parse_str(gl::EXTENSIONS)?.split(' ').map(|e| e.to_owned()).collect()
                };

                let mut extensions = Extensions::default();
                for extension in strings {
                    match &extension[..] {
                        $(
                            $string => extensions.$field = true,
                        )+
                        _ => ()
                    }
                }

                Ok(extensions)
            }
        }
    }
}

extensions! {
    "GL_ARB_compute_shader" => gl_arb_compute_shader,
    "GL_ARB_shader_storage_buffer_object" => gl_arb_shader_storage_buffer_object,
    "GL_ARB_shader_image_load_store" => gl_arb_shader_image_load_store,
    "GL_ARB_copy_image" => gl_arb_copy_image,
    "GL_ARB_copy_buffer" => gl_arb_copy_buffer,
    "GL_ARB_map_buffer_range" => gl_arb_map_buffer_range,
    "GL_ARB_framebuffer_object" => gl_arb_framebuffer_object,
    "GL_ARB_vertex_array_object" => gl_arb_vertex_array_object,
    "GL_KHR_debug" => gl_khr_debug,
    "GL_ARB_debug_output" => gl_arb_debug_output,
    "GL_EXT_texture_filter_anisotropic" => gl_ext_texture_filter_anisotropic,
    "GL_ARB_texture_filter_anisotropic" => gl_arb_texture_filter_anisotropic,
}

/// Represents the capabilities of the context.
///
/// Contrary to the state, these values never change.
#[derive(Debug)]
pub struct Capabilities {
    /// Returns a version or release number. Vendor-specific information may follow the version
    /// number.
    pub version: Version,

    /// The company responsible for this GL implementation.
    pub vendor: String,

    /// The list of OpenGL extensions support by this implementation.
    pub extensions: Extensions,

    /// The name of the renderer.
    pub renderer: String,

    /// The OpenGL context profile if available.
    pub profile: Option<Profile>,

    /// The context is in debug mode.
    pub debug: bool,

    /// Maximum number of invocations of a compute work group along each axis.
    pub max_work_group_size: [u32; 3],

    /// Maximum number of indexed shader storage bindings.
    pub max_shader_storage_bindings: u32,

    /// Maximum number of image units.
    pub max_image_units: u32,

    /// Maximum number of textures that can be bound to a program.
    pub max_combined_texture_image_units: u32,
}

impl Capabilities {
    pub unsafe fn parse() -> Result<Capabilities> {
        let version = Version::parse()?;
        let extensions = Extensions::parse(version)?;

        let debug = if version >= Version::GL(3, 0) {
            (integer(gl::CONTEXT_FLAGS) as GLenum & gl::CONTEXT_FLAG_DEBUG_BIT) != 0
        } else {
            false
        };

        let profile = if version >= Version::GL(3, 2) {
            let mask = integer(gl::CONTEXT_PROFILE_MASK) as GLenum;
            if (mask & gl::CONTEXT_COMPATIBILITY_PROFILE_BIT) != 0 {
                Some(Profile::Compatibility)
            } else if (mask & gl::CONTEXT_CORE_PROFILE_BIT) != 0 {
                Some(Profile::Core)
            } else {
                None
            }
        } else {
            None
        };

        let compute = Capabilities::has_compute(version, &extensions);
        let mut max_work_group_size = [0; 3];
        if compute {
            for (i, v) in max_work_group_size.iter_mut().enumerate() {
                let mut size = 0;
                gl::GetIntegeri_v(gl::MAX_COMPUTE_WORK_GROUP_SIZE, i as GLuint, &mut size);
                *v = size as u32;
            }
        }

        Ok(Capabilities {
            version,
            extensions,
            vendor: parse_str(gl::VENDOR)?,
            renderer: parse_str(gl::RENDERER)?,
            profile,
            debug,
            max_work_group_size,
            max_shader_storage_bindings: if compute {
                integer(gl::MAX_SHADER_STORAGE_BUFFER_BINDINGS) as u32
            } else {
                0
            },
            max_image_units: if compute {
                integer(gl::MAX_IMAGE_UNITS) as u32
            } else {
                0
            },
            max_combined_texture_image_units: integer(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS) as u32,
        })
    }

    fn has_compute(version: Version, exts: &Extensions) -> bool {
        version >= Version::GL(4, 3)
            || version >= Version::ES(3, 1)
            || (exts.gl_arb_compute_shader
                && exts.gl_arb_shader_storage_buffer_object
                && exts.gl_arb_shader_image_load_store)
    }

    pub fn has_debug_output(&self) -> bool {
        self.version >= Version::GL(4, 3)
            || self.extensions.gl_khr_debug
            || self.extensions.gl_arb_debug_output
    }

    pub fn has_anisotropy(&self) -> bool {
        self.version >= Version::GL(4, 6)
            || self.extensions.gl_ext_texture_filter_anisotropic
            || self.extensions.gl_arb_texture_filter_anisotropic
    }

    /// Fails if the context lacks any feature the resources rely on.
    pub fn check(&self) -> Result<()> {
        if self.version < Version::GL(3, 3) {
            return Err(Error::Requirement(format!("{:?} (3.3 or later)", self.version)));
        }

        if !Capabilities::has_compute(self.version, &self.extensions) {
            return Err(Error::Requirement("compute shaders".to_owned()));
        }

        if self.version < Version::GL(4, 3) && !self.extensions.gl_arb_copy_image {
            return Err(Error::Requirement("image copies".to_owned()));
        }

        Ok(())
    }
}

unsafe fn integer(name: GLenum) -> GLint {
    let mut val = 0;
    gl::GetIntegerv(name, &mut val);
    val
}

unsafe fn parse_str(id: GLenum) -> Result<String> {
    let s = gl::GetString(id);
    if s.is_null() {
        return Err(Error::Device(format!("[GL] String of {} is null.", id)));
    }

    String::from_utf8(ffi::CStr::from_ptr(s as *const _).to_bytes().to_vec())
        .map_err(|_| format_err!("[GL] String of {} is malformed.", id).into())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn version() {
        assert_eq!(
            Version::parse_str("4.5.0 NVIDIA 390.77").unwrap(),
            Version::GL(4, 5)
        );

        assert_eq!(
            Version::parse_str("OpenGL ES 3.2 Mesa 18.0").unwrap(),
            Version::ES(3, 2)
        );

        match Version::parse_str("garbage") {
            Err(Error::Device(msg)) => assert!(msg.contains("garbage")),
            other => panic!("unexpected {:?}", other),
        }

        assert!(Version::GL(4, 3) > Version::GL(3, 3));
        assert!(!(Version::GL(4, 3) > Version::ES(3, 0)));
        assert!(!(Version::GL(4, 3) < Version::ES(3, 0)));
    }
}
