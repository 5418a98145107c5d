#![doc = include_str!("../README.md")]

mod config;
mod formats;
mod telemetry;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, Config};
use idutils::{SnowflakeGenerator, id_end_of_time, id_end_of_timestamp, id_to_time};
use telemetry::init_logging;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_logging()?;
    let config = Config::try_from(args)?;
    tracing::debug!(?config, "starting");

    let stdout = std::io::stdout();
    run(&config, &mut stdout.lock())
}

/// Writes one line per requested conversion, in flag order.
fn run(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    if let Some(id) = config.id {
        writeln!(out, "{}", id_to_time(id).format("%d %b %y %H:%M UTC"))?;
    }

    if let Some(unix_millis) = config.unix_millis {
        writeln!(out, "{}", id_end_of_timestamp(unix_millis))?;
    }

    if let Some(time) = &config.time {
        writeln!(out, "{}", id_end_of_time(time))?;
    }

    if let Some(generate) = &config.generate {
        let generator = SnowflakeGenerator::new(generate.worker_id, generate.datacenter_id)
            .context("failed to create generator")?;
        for _ in 0..generate.count {
            let id = generator.next_id().context("failed to generate id")?;
            writeln!(out, "{id}")?;
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerateConfig;
    use crate::formats::parse_time;

    fn render(config: &Config) -> String {
        let mut out = Vec::new();
        run(config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn id_prints_minute_precision_utc() {
        let config = Config {
            id: Some(1_061_361_893_660_164_095),
            ..Config::default()
        };
        assert_eq!(render(&config), "10 Nov 18 20:56 UTC\n");
    }

    #[test]
    fn unix_prints_end_of_millisecond() {
        let config = Config {
            unix_millis: Some(1_541_883_369_000),
            ..Config::default()
        };
        assert_eq!(render(&config), format!("{}\n", id_end_of_timestamp(1_541_883_369_000)));
    }

    #[test]
    fn time_prints_end_of_millisecond() {
        let (time, _) = parse_time("2018-11-10T20:56:09.255Z").unwrap();
        let config = Config {
            time: Some(time),
            ..Config::default()
        };
        assert_eq!(render(&config), "1061361893660164095\n");
    }

    #[test]
    fn generate_prints_increasing_ids_for_location() {
        let config = Config {
            generate: Some(GenerateConfig {
                count: 5,
                worker_id: 3,
                datacenter_id: 7,
            }),
            ..Config::default()
        };
        let ids: Vec<i64> = render(&config)
            .lines()
            .map(|line| line.parse().unwrap())
            .collect();

        assert_eq!(ids.len(), 5);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        for raw in ids {
            let id = idutils::SnowflakeId::from_raw(raw);
            assert_eq!(id.worker_id(), 3);
            assert_eq!(id.datacenter_id(), 7);
        }
    }

    #[test]
    fn combined_flags_print_in_fixed_order() {
        let (time, _) = parse_time("Sat, 10 Nov 2018 20:56:09 GMT").unwrap();
        let config = Config {
            id: Some(1_061_361_893_660_164_095),
            unix_millis: Some(1_541_883_369_000),
            time: Some(time),
            generate: Some(GenerateConfig {
                count: 1,
                worker_id: 0,
                datacenter_id: 0,
            }),
        };
        let output = render(&config);
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "10 Nov 18 20:56 UTC");
        assert_eq!(lines[1], id_end_of_timestamp(1_541_883_369_000).to_string());
        assert_eq!(lines[2], lines[1]);
        assert!(lines[3].parse::<i64>().unwrap() > 0);
    }
}
