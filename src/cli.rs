use clap::Parser;
use log::LevelFilter;

use crate::zip::{ExtractOptions, Overwrite};

#[derive(Parser, Debug)]
#[command(name = "scanzip")]
#[command(version)]
#[command(about = "Extract ZIP archives by scanning for local file headers", long_about = None)]
#[command(after_help = "Examples:\n  \
  scanzip broken.zip                  recover what is left of a truncated archive\n  \
  scanzip a.zip b.zip -d out          extract two archives into out/\n  \
  scanzip -p foo.zip | more           send contents of foo.zip via pipe into more\n  \
  scanzip -l https://example.com/archive.zip   list files from remote ZIP")]
pub struct Cli {
    /// ZIP file paths or HTTP URLs
    #[arg(value_name = "ARCHIVE", required = true, num_args = 1..)]
    pub archives: Vec<String>,

    /// List files (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely/show version info
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract files to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract files into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Exclude files matching PATTERN (may be repeated)
    #[arg(short = 'x', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Never overwrite existing files
    #[arg(short = 'n', conflicts_with = "overwrite")]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Junk paths (do not make directories)
    #[arg(short = 'j')]
    pub junk_paths: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

pub fn is_http_url(archive: &str) -> bool {
    archive.starts_with("http://") || archive.starts_with("https://")
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Most verbose level the logger lets through.
    pub fn log_level(&self) -> LevelFilter {
        if self.is_very_quiet() || self.pipe {
            LevelFilter::Error
        } else if self.is_quiet() {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        let overwrite = if self.overwrite {
            Overwrite::Always
        } else if self.never_overwrite {
            Overwrite::Never
        } else {
            Overwrite::Ask
        };
        ExtractOptions {
            dest: self.extract_dir.clone().unwrap_or_default().into(),
            junk_paths: self.junk_paths,
            overwrite,
        }
    }

    /// Whether an entry name is excluded by one of the `-x` patterns.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude
            .iter()
            .any(|x| name.contains(x.as_str()) || glob_match(x, name))
    }
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            (Some('*'), _) => {
                // Either the star matches nothing, or it eats one more character
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}
