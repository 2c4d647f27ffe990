mod types;
mod visitor;

pub use self::visitor::GlutinVisitor;

use crate::errors::*;
use crate::settings::{ContextParams, WindowParams};

use super::Visitor;

pub fn new(window: &WindowParams, context: &ContextParams) -> Result<Box<dyn Visitor>> {
    let visitor = GlutinVisitor::new(window, context)?;
    Ok(Box::new(visitor))
}
