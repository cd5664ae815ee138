//! Command-line arguments and the validated runtime configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use super::error::AppError;
use crate::domain::DeviceType;
use crate::engine::{ConcurrencyLimiter, DEFAULT_CAPACITY, DEFAULT_ERROR_THRESHOLD, ErrorRateEvaluator};
use crate::pipeline::FileProcessor;
use crate::storage::{DEFAULT_MAX_IDLE_CONNS, DEFAULT_TIMEOUT, MemcacheClient, ShardTable};

const DEFAULT_PATTERN: &str = "/data/appsinstalled/*.tsv.gz";
const DEFAULT_TIMEOUT_MS: u64 = DEFAULT_TIMEOUT.as_millis() as u64;

/// Load gzipped device/app logs into memcached, sharded by device type
#[derive(Parser, Debug, Clone)]
#[command(
    name = "memc-load",
    version,
    about = "Load gzipped device/app logs into memcached, sharded by device type",
    after_help = "EXAMPLES:\n    \
        memc-load --pattern '/data/appsinstalled/*.tsv.gz'\n    \
        memc-load --dry --log load.log\n    \
        memc-load --test"
)]
pub struct CliArgs {
    /// Glob matching the input files
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// memcached address for idfa devices
    #[arg(long, default_value = "127.0.0.1:33013")]
    pub idfa: String,

    /// memcached address for gaid devices
    #[arg(long, default_value = "127.0.0.1:33014")]
    pub gaid: String,

    /// memcached address for adid devices
    #[arg(long, default_value = "127.0.0.1:33015")]
    pub adid: String,

    /// memcached address for dvid devices
    #[arg(long, default_value = "127.0.0.1:33016")]
    pub dvid: String,

    /// Log would-be writes instead of sending them
    #[arg(long)]
    pub dry: bool,

    /// Append log output to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Run the codec self-test and exit
    #[arg(long)]
    pub test: bool,

    /// Maximum writes in flight at once
    #[arg(long, default_value_t = DEFAULT_CAPACITY, value_name = "NUM")]
    pub concurrency: usize,

    /// Acceptable errors/processed ratio per file
    #[arg(long, default_value_t = DEFAULT_ERROR_THRESHOLD, value_name = "RATE")]
    pub error_threshold: f64,

    /// Per-write backend timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS, value_name = "MS")]
    pub timeout_ms: u64,

    /// Idle connections pooled per backend
    #[arg(long, default_value_t = DEFAULT_MAX_IDLE_CONNS, value_name = "NUM")]
    pub max_idle_conns: usize,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub pattern: String,
    pub backends: Vec<(DeviceType, String)>,
    pub dry_run: bool,
    pub log_file: Option<PathBuf>,
    pub self_test: bool,
    pub concurrency: usize,
    pub error_threshold: f64,
    pub timeout: Duration,
    pub max_idle_conns: usize,
    pub verbose: bool,
}

impl TryFrom<CliArgs> for LoaderConfig {
    type Error = AppError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.concurrency == 0 {
            return Err(AppError::InvalidArguments(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if !(args.error_threshold > 0.0 && args.error_threshold <= 1.0) {
            return Err(AppError::InvalidArguments(format!(
                "error threshold must be in (0, 1], got {}",
                args.error_threshold
            )));
        }
        if args.timeout_ms == 0 {
            return Err(AppError::InvalidArguments(
                "timeout must be positive".to_string(),
            ));
        }

        let backends = vec![
            (DeviceType::Idfa, args.idfa),
            (DeviceType::Gaid, args.gaid),
            (DeviceType::Adid, args.adid),
            (DeviceType::Dvid, args.dvid),
        ];
        if let Some((device_type, _)) = backends.iter().find(|(_, addr)| addr.trim().is_empty()) {
            return Err(AppError::InvalidArguments(format!(
                "empty backend address for {device_type}"
            )));
        }

        Ok(Self {
            pattern: args.pattern,
            backends,
            dry_run: args.dry,
            log_file: args.log,
            self_test: args.test,
            concurrency: args.concurrency,
            error_threshold: args.error_threshold,
            timeout: Duration::from_millis(args.timeout_ms),
            max_idle_conns: args.max_idle_conns,
            verbose: args.verbose,
        })
    }
}

impl LoaderConfig {
    /// One memcached client per device type; connections open lazily
    pub fn shard_table(&self) -> ShardTable {
        self.backends
            .iter()
            .fold(ShardTable::new(), |table, (device_type, addr)| {
                let client = MemcacheClient::new(addr.clone())
                    .with_timeout(self.timeout)
                    .with_max_idle(self.max_idle_conns);
                table.with_shard(*device_type, Arc::new(client))
            })
    }

    pub fn file_processor(&self) -> FileProcessor {
        FileProcessor::new(Arc::new(self.shard_table()))
            .with_limiter(ConcurrencyLimiter::new(self.concurrency))
            .with_evaluator(ErrorRateEvaluator::new(self.error_threshold))
            .with_dry_run(self.dry_run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<LoaderConfig, AppError> {
        let mut argv = vec!["memc-load"];
        argv.extend_from_slice(args);
        LoaderConfig::try_from(CliArgs::try_parse_from(argv).unwrap())
    }

    #[test]
    fn defaults_are_applied() {
        let config = parse(&[]).unwrap();

        assert_eq!(config.pattern, DEFAULT_PATTERN);
        assert_eq!(config.concurrency, 100);
        assert_eq!(config.error_threshold, 0.01);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.max_idle_conns, 10);
        assert!(!config.dry_run);
        assert!(!config.self_test);
        assert_eq!(
            config.backends,
            vec![
                (DeviceType::Idfa, "127.0.0.1:33013".to_string()),
                (DeviceType::Gaid, "127.0.0.1:33014".to_string()),
                (DeviceType::Adid, "127.0.0.1:33015".to_string()),
                (DeviceType::Dvid, "127.0.0.1:33016".to_string()),
            ]
        );
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--pattern",
            "/tmp/*.gz",
            "--idfa",
            "10.0.0.1:11211",
            "--dry",
            "--concurrency",
            "8",
            "--log",
            "/tmp/load.log",
        ])
        .unwrap();

        assert_eq!(config.pattern, "/tmp/*.gz");
        assert_eq!(config.backends[0].1, "10.0.0.1:11211");
        assert!(config.dry_run);
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/load.log")));
    }

    #[test]
    fn rejects_zero_concurrency() {
        assert!(matches!(
            parse(&["--concurrency", "0"]),
            Err(AppError::InvalidArguments(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        assert!(parse(&["--error-threshold", "0"]).is_err());
        assert!(parse(&["--error-threshold", "1.5"]).is_err());
        assert!(parse(&["--error-threshold", "1"]).is_ok());
    }

    #[test]
    fn rejects_empty_backend_address() {
        assert!(matches!(
            parse(&["--gaid", ""]),
            Err(AppError::InvalidArguments(msg)) if msg.contains("gaid")
        ));
    }

    #[test]
    fn shard_table_covers_every_device_type() {
        let table = parse(&[]).unwrap().shard_table();
        assert_eq!(table.len(), 4);
        assert_eq!(table.route("dvid").unwrap().addr(), "127.0.0.1:33016");
    }

    #[test]
    fn processor_uses_configured_capacity() {
        let processor = parse(&["--concurrency", "7"]).unwrap().file_processor();
        assert_eq!(processor.limiter().capacity(), 7);
    }
}
