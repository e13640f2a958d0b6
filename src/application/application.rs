use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::commands::CommandError;
use crate::config::{FsImage, ImageError};
use crate::fs::{Dir, FsError};
use crate::shell::Session;

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();

        let root = Dir::root();
        if let Some(image_path) = &app_config.image {
            let image = FsImage::from_path(image_path.clone())
                .await
                .context(ImageSnafu)?;
            debug!("Loaded image: {:?}", image);
            image.apply(&root).context(SeedSnafu)?;
            info!("Seeded the tree from {}", image_path.display());
        }

        let mut session = Session::new(root);
        match &app_config.command {
            Some(script) => session.run_batch(script).context(BatchSnafu)?,
            None => session.run_interactive().context(InputSnafu)?,
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the startup image"))]
    ImageError { source: ImageError },
    #[snafu(display("Critical failure encountered while seeding the tree from the image"))]
    SeedError { source: FsError },
    #[snafu(display("Critical failure encountered during batch execution"))]
    BatchError { source: CommandError },
    #[snafu(display("Critical failure encountered while reading shell input"))]
    InputError { source: std::io::Error },
}
