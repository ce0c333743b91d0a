//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{default_config_path, Config};

/// Twitter/X video resolver CLI.
#[derive(Parser, Debug)]
#[command(
    name = "xdl-resolver",
    version,
    about = "Resolve the best downloadable Twitter/X video from captured browser traffic",
    long_about = "Replays a JSON-lines capture of browser network events through the resolution engine,\n\
                  prints the best directly downloadable MP4 URL for a tab and optionally saves it."
)]
pub struct Args {
    /// Capture file with one JSON event per line.
    #[arg(short, long)]
    pub events: PathBuf,

    /// Tab the download is requested from.
    #[arg(short, long)]
    pub tab: i64,

    /// Media id of the video. Leave empty to take the most recent one.
    #[arg(short, long, default_value = "")]
    pub media_id: String,

    /// Save the resolved video.
    #[arg(long)]
    pub download: bool,

    /// Path to configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Folder for images, relative to the download directory.
    #[arg(long, env = "XDL_IMAGE_FOLDER")]
    pub image_folder: Option<String>,

    /// Folder for videos, relative to the download directory.
    #[arg(long, env = "XDL_VIDEO_FOLDER")]
    pub video_folder: Option<String>,

    /// Browser user agent string used for downloads.
    #[arg(short = 'a', long = "user-agent", env = "XDL_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Configuration file to load.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(dir) = &self.download_directory {
            config.options.download_directory = Some(dir.clone());
        }

        if let Some(folder) = &self.image_folder {
            config.options.image_folder = folder.clone();
        }

        if let Some(folder) = &self.video_folder {
            config.options.video_folder = folder.clone();
        }

        if let Some(user_agent) = &self.user_agent {
            config.network.user_agent = user_agent.clone();
        }

        if self.quiet {
            config.options.show_downloads = false;
        }
    }
}
