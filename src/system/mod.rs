//! External collaborators the orchestrators drive
//!
//! Each facility sits behind a trait so the pipelines can be exercised
//! against fakes:
//!
//! - [`RegistryTool`]: registry subtree export/import (`reg.exe`)
//! - [`Archiver`]: profile tree compression/decompression (zip)
//! - [`ProcessControl`]: browser process query/termination

mod archive;
mod process;
mod registry;

#[cfg(test)]
pub(crate) mod fakes;

pub use archive::{Archiver, ZipArchiver};
pub use process::{ProcessControl, TaskList};
pub use registry::{RegCommand, RegistryTool};

/// The set of collaborators one run uses
pub struct Toolkit {
    pub registry: Box<dyn RegistryTool>,
    pub archiver: Box<dyn Archiver>,
    pub processes: Box<dyn ProcessControl>,
}

impl Toolkit {
    /// The production collaborators
    pub fn system() -> Self {
        Self {
            registry: Box::new(RegCommand::new()),
            archiver: Box::new(ZipArchiver::new()),
            processes: Box::new(TaskList::new()),
        }
    }
}
