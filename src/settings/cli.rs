// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "Capture and render images from an 8x8 thermal sensor")]
pub(crate) struct Args {
    /// Path to a configuration file. Defaults are used if the file does not exist.
    #[structopt(
        short,
        long = "config",
        parse(from_os_str),
        default_value = "config.toml"
    )]
    pub(crate) config_path: PathBuf,

    /// Temperature (in Celsius) mapped to the cold end of the gradient.
    #[structopt(long, allow_hyphen_values = true)]
    pub(crate) min: Option<f32>,

    /// Temperature (in Celsius) mapped to the hot end of the gradient.
    #[structopt(long, allow_hyphen_values = true)]
    pub(crate) max: Option<f32>,

    #[structopt(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, PartialEq, StructOpt)]
pub(crate) enum Command {
    /// Print the connection state and temperature range as JSON.
    Status,

    /// Print one frame of temperatures as JSON.
    Raw,

    /// Capture a single frame and write only the rendered PNG.
    Image {
        /// Where to write the image. The PNG is written to stdout if not given.
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },

    /// Capture a single frame, writing the rendered image, plot and text dump.
    Capture {
        /// Base path for the output files. Any extension is removed.
        #[structopt(short, long, parse(from_os_str), default_value = "thermal")]
        output: PathBuf,
    },

    /// Capture frames repeatedly, writing each one to a numbered set of files.
    Watch {
        /// Seconds between captures.
        #[structopt(short, long)]
        interval: Option<f32>,

        /// Stop after this many captures.
        #[structopt(short = "n", long)]
        count: Option<u32>,

        /// Directory to write captures to.
        #[structopt(short, long, parse(from_os_str))]
        directory: Option<PathBuf>,
    },

    /// Render a frame from a recording file without a sensor.
    Render {
        /// A TOML recording of frames.
        #[structopt(short, long, parse(from_os_str))]
        input: PathBuf,

        /// Which frame of the recording to render.
        #[structopt(long, default_value = "0")]
        index: usize,

        /// Base path for the output files. Any extension is removed.
        #[structopt(short, long, parse(from_os_str))]
        output: PathBuf,
    },
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use structopt::StructOpt;

    use super::{Args, Command};

    fn parse(args: &[&str]) -> Args {
        let parsed = Args::from_iter_safe(args);
        assert!(
            parsed.is_ok(),
            "Failed to parse {:?}: {}",
            args,
            parsed.unwrap_err()
        );
        parsed.unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse(&["grideye-viz", "status"]);
        assert_eq!(args.config_path, PathBuf::from("config.toml"));
        assert_eq!(args.min, None);
        assert_eq!(args.max, None);
        assert_eq!(args.command, Command::Status);
    }

    #[test]
    fn range_overrides() {
        let args = parse(&["grideye-viz", "--min", "-5", "--max", "40.5", "raw"]);
        assert_eq!(args.min, Some(-5.0));
        assert_eq!(args.max, Some(40.5));
        assert_eq!(args.command, Command::Raw);
    }

    #[test]
    fn capture_output() {
        let args = parse(&["grideye-viz", "-c", "other.toml", "capture", "-o", "out/shot"]);
        assert_eq!(args.config_path, PathBuf::from("other.toml"));
        assert_eq!(
            args.command,
            Command::Capture {
                output: PathBuf::from("out/shot")
            }
        );
    }

    #[test]
    fn image_output() {
        let args = parse(&["grideye-viz", "image"]);
        assert_eq!(args.command, Command::Image { output: None });
        let args = parse(&["grideye-viz", "image", "--output", "frame.png"]);
        assert_eq!(
            args.command,
            Command::Image {
                output: Some(PathBuf::from("frame.png"))
            }
        );
    }

    #[test]
    fn watch() {
        let args = parse(&["grideye-viz", "watch", "--interval", "2.5", "-n", "3"]);
        assert_eq!(
            args.command,
            Command::Watch {
                interval: Some(2.5),
                count: Some(3),
                directory: None,
            }
        );
    }

    #[test]
    fn render_requires_input() {
        assert!(Args::from_iter_safe(&["grideye-viz", "render", "-o", "out"]).is_err());
        let args = parse(&[
            "grideye-viz",
            "render",
            "--input",
            "recording.toml",
            "--index",
            "4",
            "--output",
            "out",
        ]);
        assert_eq!(
            args.command,
            Command::Render {
                input: PathBuf::from("recording.toml"),
                index: 4,
                output: PathBuf::from("out"),
            }
        );
    }

    #[test]
    fn missing_subcommand() {
        assert!(Args::from_iter_safe(&["grideye-viz"]).is_err());
    }
}
