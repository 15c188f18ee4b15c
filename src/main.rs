use clap::Parser;
use hobd::core::config::{self, HobdConfig, StartOverrides};
use hobd::core::position::{LessonId, is_valid_day};
use hobd::core::state::App;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "hobd", about = "Terminal reader for e-HOBD devotional lessons")]
struct Args {
    /// Language code, e.g. "en"
    #[arg(short, long)]
    lang: Option<String>,

    /// Lesson to open, as a number (5) or id (lesson-05)
    #[arg(short = 'n', long, value_parser = parse_lesson)]
    lesson: Option<LessonId>,

    /// Day of the lesson (1-7)
    #[arg(short, long, value_parser = parse_day)]
    day: Option<u8>,

    /// Content root URL
    #[arg(long)]
    base_url: Option<String>,
}

fn parse_lesson(s: &str) -> Result<LessonId, String> {
    let text = if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        format!("lesson-{s}")
    } else {
        s.to_string()
    };
    LessonId::parse(&text).ok_or_else(|| format!("expected a lesson number or lesson-NN, got '{s}'"))
}

fn parse_day(s: &str) -> Result<u8, String> {
    s.parse::<u8>()
        .ok()
        .filter(|d| is_valid_day(*d))
        .ok_or_else(|| format!("day must be 1-7, got '{s}'"))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to hobd.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("hobd.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        eprintln!("hobd: {e}; using defaults");
        HobdConfig::default()
    });

    let start = StartOverrides {
        language: args.lang,
        lesson: args.lesson,
        day: args.day,
    };
    let resolved = config::resolve(&file_config, args.base_url.as_deref(), start);
    log::info!("hobd starting with content from {}", resolved.base_url);

    let app = App::from_config(&resolved).map_err(std::io::Error::other)?;
    hobd::tui::run(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lesson_is_padded() {
        assert_eq!(parse_lesson("5").unwrap().as_str(), "lesson-05");
        assert_eq!(parse_lesson("lesson-5").unwrap().as_str(), "lesson-05");
        assert_eq!(parse_lesson("lesson-12").unwrap().as_str(), "lesson-12");
    }

    #[test]
    fn test_parse_lesson_rejects_bad_input() {
        assert!(parse_lesson("0").is_err());
        assert!(parse_lesson("five").is_err());
        assert!(parse_lesson("99999999999").is_err());
    }
}
