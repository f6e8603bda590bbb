//! Adjust the line height of OpenType fonts by scaling their vertical metrics.
use clap::Parser;
use fontpatch::{Font, FontError, Metric};
use snafu::Snafu;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub mod patch;
pub mod report;

pub use patch::{patch, PatchOptions, PatchReport};

/// A metric scale factor.
///
/// Displays the way a float's shortest repr reads in the generated font and
/// file names: always with a fractional part (`2.0`, not `2`), and in
/// exponent form with a signed two-digit exponent below `1e-4` or from
/// `1e16` up (`5e-05`, `1e+16`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Factor(pub f64);

impl FromStr for Factor {
    type Err = std::num::ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Factor)
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.abs();
        if !self.0.is_finite() {
            return write!(f, "{}", self.0);
        }
        if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
            let s = format!("{:e}", self.0);
            let (mantissa, exponent) = s.split_once('e').unwrap_or((s.as_str(), "0"));
            let exponent: i32 = exponent.parse().unwrap_or_default();
            let sign = if exponent < 0 { '-' } else { '+' };
            return write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs());
        }
        let s = self.0.to_string();
        if s.contains('.') {
            f.write_str(&s)
        } else {
            write!(f, "{}.0", s)
        }
    }
}

/// Adjust font line height and other metrics
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input font file
    #[clap(short, long)]
    pub input: PathBuf,

    /// Output directory for the patched font
    #[clap(short = 'o', long = "outputDir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Factor to adjust the ascent metrics by; descent metrics use twice this
    #[clap(short, long, default_value = "1.3")]
    pub factor: Factor,

    /// Override the fontname (default: append factor to original)
    #[clap(long)]
    pub fontname: Option<String>,

    /// Override the family name (default: append factor to original)
    #[clap(long)]
    pub familyname: Option<String>,

    /// Override the full name (default: append factor to original)
    #[clap(long)]
    pub fullname: Option<String>,

    /// Increase logging
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: usize,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PatchError {
    #[snafu(context(false), display("{}", source))]
    Font { source: FontError },

    #[snafu(display("Scaling {} ({}) by {} does not give a number", metric, value, multiplier))]
    NotANumber {
        metric: Metric,
        value: i64,
        multiplier: f64,
    },
}

/// Set up `env_logger`, honouring `RUST_LOG` and otherwise picking a level
/// from the number of `-v` flags.
pub fn init_logging(verbose: usize) {
    env_logger::init_from_env(env_logger::Env::default().filter_or(
        env_logger::DEFAULT_FILTER_ENV,
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        },
    ));
}

/// Load the input font, patch it and write the result.
pub fn run(args: &Args) -> Result<PatchReport, PatchError> {
    let mut font = Font::load(&args.input)?;
    patch(&mut font, &args.input, &PatchOptions::from(args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_display() {
        assert_eq!(Factor(1.3).to_string(), "1.3");
        assert_eq!(Factor(2.0).to_string(), "2.0");
        assert_eq!(Factor(1.0).to_string(), "1.0");
        assert_eq!(Factor(0.25).to_string(), "0.25");
        assert_eq!(Factor(f64::INFINITY).to_string(), "inf");
        assert_eq!(Factor(0.0001).to_string(), "0.0001");
        assert_eq!(Factor(0.00005).to_string(), "5e-05");
        assert_eq!(Factor(1.5e-7).to_string(), "1.5e-07");
        assert_eq!(Factor(1e16).to_string(), "1e+16");
        assert_eq!(Factor(2.5e300).to_string(), "2.5e+300");
        assert_eq!(Factor(123456789.0).to_string(), "123456789.0");
    }

    #[test]
    fn factor_parse() {
        assert_eq!("1.5".parse::<Factor>().unwrap(), Factor(1.5));
        assert_eq!(" 2 ".parse::<Factor>().unwrap(), Factor(2.0));
        assert!("tall".parse::<Factor>().is_err());
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["ttf-adjust-line-height", "-i", "Foo.ttf"]).unwrap();
        assert_eq!(args.input, PathBuf::from("Foo.ttf"));
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert_eq!(args.factor, Factor(1.3));
        assert_eq!(args.fontname, None);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn all_flags() {
        let args = Args::try_parse_from([
            "ttf-adjust-line-height",
            "--input",
            "in/Foo.otf",
            "--outputDir",
            "out",
            "--factor",
            "1.1",
            "--fontname",
            "FooTall",
            "--familyname",
            "Foo Tall",
            "--fullname",
            "Foo Tall Regular",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.factor, Factor(1.1));
        assert_eq!(args.fontname.as_deref(), Some("FooTall"));
        assert_eq!(args.familyname.as_deref(), Some("Foo Tall"));
        assert_eq!(args.fullname.as_deref(), Some("Foo Tall Regular"));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn bad_arguments() {
        assert!(Args::try_parse_from(["ttf-adjust-line-height", "-i", "a.ttf", "-f", "x"]).is_err());
        assert!(Args::try_parse_from(["ttf-adjust-line-height", "-f", "1.2"]).is_err());
    }
}
