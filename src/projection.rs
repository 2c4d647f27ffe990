use cgmath::{BaseFloat, Matrix4};

use crate::errors::*;

/// An orthographic projection that maps the box `[left, right] x [bottom, top] x
/// [-near, -far]` to normalized device coordinates.
pub fn ortho<S: BaseFloat>(left: S, right: S, bottom: S, top: S, near: S, far: S) -> Result<Matrix4<S>> {
    if left == right || bottom == top || near == far {
        return Err(Error::InvalidArgument(format!(
            "degenerate orthographic volume ({:?}, {:?}, {:?}, {:?}, {:?}, {:?})",
            left, right, bottom, top, near, far
        )));
    }

    Ok(cgmath::ortho(left, right, bottom, top, near, far))
}

#[cfg(test)]
mod test {
    use super::*;
    use cgmath::{Vector4, SquareMatrix};

    #[test]
    fn unit() {
        let m = ortho(-1.0f32, 1.0, -1.0, 1.0, 1.0, -1.0).unwrap();
        let v = m * Vector4::new(0.5, -0.25, 0.0, 1.0);
        assert_eq!(v, Vector4::new(0.5, -0.25, 0.0, 1.0));
    }

    #[test]
    fn pixels() {
        let m = ortho(0.0f32, 4.0, 0.0, 4.0, -1.0, 1.0).unwrap();
        let v = m * Vector4::new(4.0, 0.0, 0.0, 1.0);
        assert_eq!(v, Vector4::new(1.0, -1.0, 0.0, 1.0));
        assert!(m.is_invertible());
    }

    #[test]
    fn degenerate() {
        assert!(ortho(1.0f32, 1.0, 0.0, 1.0, 0.0, 1.0).is_err());
        assert!(ortho(0.0f32, 1.0, 2.0, 2.0, 0.0, 1.0).is_err());
        assert!(ortho(0.0f64, 1.0, 0.0, 1.0, 3.0, 3.0).is_err());
    }
}
