use anyhow::{anyhow, bail};
use chrono::{DateTime, FixedOffset};
use clap::Parser;
use idutils::SnowflakeId;

use crate::formats::{TIME_FORMATS, parse_time};

/// Command line for the `idtool` binary.
///
/// Every conversion flag may be combined; results are printed one per line
/// in the order id, unix, time, generate.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "idtool",
    version,
    about = "Convert between Snowflake IDs and timestamps"
)]
pub struct CliArgs {
    /// Print the UTC time a Snowflake ID was minted at.
    ///
    /// Environment variable: `IDTOOL_ID`
    #[arg(long, env = "IDTOOL_ID", allow_negative_numbers = true)]
    pub id: Option<i64>,

    /// Print the largest ID minted at a Unix time given in seconds.
    ///
    /// Environment variable: `IDTOOL_UNIX`
    #[arg(long, env = "IDTOOL_UNIX", allow_negative_numbers = true)]
    pub unix: Option<i64>,

    /// Print the largest ID minted at a human-readable time.
    ///
    /// Accepts ANSIC, UnixDate, RubyDate, RFC822, RFC822Z, RFC850, RFC1123,
    /// RFC1123Z and RFC3339 layouts. Zone abbreviations are read as UTC.
    ///
    /// Environment variable: `IDTOOL_TIME`
    #[arg(long, env = "IDTOOL_TIME")]
    pub time: Option<String>,

    /// Mint this many fresh IDs.
    ///
    /// Environment variable: `IDTOOL_GENERATE`
    #[arg(long, env = "IDTOOL_GENERATE")]
    pub generate: Option<u32>,

    /// Worker id used by `--generate`.
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(long, env = "WORKER_ID", default_value_t = 0, allow_negative_numbers = true)]
    pub worker_id: i64,

    /// Datacenter id used by `--generate`.
    ///
    /// Environment variable: `DATACENTER_ID`
    #[arg(long, env = "DATACENTER_ID", default_value_t = 0, allow_negative_numbers = true)]
    pub datacenter_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    pub count: u32,
    pub worker_id: i64,
    pub datacenter_id: i64,
}

/// Validated work for a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub id: Option<i64>,
    pub unix_millis: Option<i64>,
    pub time: Option<DateTime<FixedOffset>>,
    pub generate: Option<GenerateConfig>,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.id.is_none()
            && args.unix.is_none()
            && args.time.is_none()
            && args.generate.is_none()
        {
            bail!("nothing to do: pass at least one of --id, --unix, --time or --generate");
        }

        match args.id {
            Some(id) if id <= 0 => bail!("--id must be a positive Snowflake ID, got {id}"),
            _ => {}
        }

        let unix_millis = match args.unix {
            Some(secs) if secs <= 0 => bail!("--unix must be a positive number of seconds, got {secs}"),
            Some(secs) => Some(
                secs.checked_mul(1000)
                    .ok_or_else(|| anyhow!("--unix {secs} overflows a millisecond timestamp"))?,
            ),
            None => None,
        };

        let time = match args.time.as_deref() {
            Some(input) => {
                let (time, format) = parse_time(input).ok_or_else(|| {
                    let names: Vec<_> = TIME_FORMATS.iter().map(|f| f.name).collect();
                    anyhow!(
                        "unrecognized --time {input:?}; expected one of: {}",
                        names.join(", ")
                    )
                })?;
                tracing::debug!(input, format = format.name, %time, "parsed --time");
                Some(time)
            }
            None => None,
        };

        let generate = match args.generate {
            Some(count) => {
                let max_worker_id = SnowflakeId::max_worker_id();
                let max_datacenter_id = SnowflakeId::max_datacenter_id();
                if !(0..=max_worker_id).contains(&args.worker_id) {
                    bail!(
                        "WORKER_ID ({}) must be between 0 and {}",
                        args.worker_id,
                        max_worker_id
                    );
                }
                if !(0..=max_datacenter_id).contains(&args.datacenter_id) {
                    bail!(
                        "DATACENTER_ID ({}) must be between 0 and {}",
                        args.datacenter_id,
                        max_datacenter_id
                    );
                }
                Some(GenerateConfig {
                    count,
                    worker_id: args.worker_id,
                    datacenter_id: args.datacenter_id,
                })
            }
            None => None,
        };

        Ok(Self {
            id: args.id,
            unix_millis,
            time,
            generate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> anyhow::Result<Config> {
        let args = CliArgs::try_parse_from(std::iter::once("idtool").chain(argv.iter().copied()))?;
        Config::try_from(args)
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }

    #[test]
    fn accepts_each_conversion() {
        let config = parse(&["--id", "1061361893660164095"]).unwrap();
        assert_eq!(config.id, Some(1_061_361_893_660_164_095));

        let config = parse(&["--unix", "1541883369"]).unwrap();
        assert_eq!(config.unix_millis, Some(1_541_883_369_000));

        let config = parse(&["--time", "2018-11-10T20:56:09.255Z"]).unwrap();
        assert_eq!(
            config.time.map(|t| t.timestamp_millis()),
            Some(1_541_883_369_255)
        );

        let config = parse(&["--generate", "3", "--worker-id", "31", "--datacenter-id", "2"]).unwrap();
        assert_eq!(
            config.generate,
            Some(GenerateConfig {
                count: 3,
                worker_id: 31,
                datacenter_id: 2,
            })
        );
    }

    #[test]
    fn rejects_non_positive_input() {
        let err = parse(&["--id", "0"]).unwrap_err();
        assert!(err.to_string().contains("--id must be a positive"));

        let err = parse(&["--id", "-7"]).unwrap_err();
        assert!(err.to_string().contains("got -7"));

        let err = parse(&["--unix", "-1"]).unwrap_err();
        assert!(err.to_string().contains("--unix must be a positive"));
    }

    #[test]
    fn rejects_overflowing_unix_seconds() {
        let err = parse(&["--unix", &i64::MAX.to_string()]).unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn rejects_unparseable_time() {
        let err = parse(&["--time", "last tuesday"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unrecognized --time"));
        assert!(message.contains("RFC3339"));
    }

    #[test]
    fn rejects_out_of_range_location() {
        let err = parse(&["--generate", "1", "--worker-id", "32"]).unwrap_err();
        assert!(err.to_string().contains("WORKER_ID (32)"));

        let err = parse(&["--generate", "1", "--datacenter-id", "-1"]).unwrap_err();
        assert!(err.to_string().contains("DATACENTER_ID (-1)"));
    }

    #[test]
    fn location_is_ignored_without_generate() {
        let config = parse(&["--id", "1", "--worker-id", "99"]).unwrap();
        assert_eq!(config.generate, None);
    }

    #[test]
    fn requires_some_work() {
        let err = parse(&[]).unwrap_err();
        assert!(err.to_string().contains("nothing to do"));
    }
}
