//! lcache CLI
//!
//! Walks through the cache protocol and runs a small concurrent load test.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lcache::{CacheConfig, CacheStats, ExpireVal, LoadError, LocalCache};

/// lcache - in-process memoizing cache
#[derive(Parser)]
#[command(name = "lcache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through load, hit, set, add and expiry
    Demo,

    /// Hammer a cache from several threads and report counters
    Bench {
        /// Number of distinct keys
        #[arg(short, long, default_value = "16")]
        keys: usize,
        /// Number of worker threads
        #[arg(short, long, default_value = "8")]
        threads: usize,
        /// Lookups per thread
        #[arg(short, long, default_value = "1000")]
        iterations: usize,
        /// Simulated loader latency in milliseconds
        #[arg(long, env = "LCACHE_BENCH_LATENCY_MS", default_value = "5")]
        latency_ms: u64,
        /// Entry ttl in milliseconds
        #[arg(long, env = "LCACHE_BENCH_TTL_MS", default_value = "200")]
        ttl_ms: u64,
        /// Emit the final counters as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "lcache=debug,info"
    } else {
        "lcache=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env().context("Invalid cache configuration")?;

    match cli.command {
        Commands::Demo => cmd_demo(&config),
        Commands::Bench {
            keys,
            threads,
            iterations,
            latency_ms,
            ttl_ms,
            json,
        } => cmd_bench(
            &config,
            BenchOptions {
                keys,
                threads,
                iterations,
                latency: Duration::from_millis(latency_ms),
                ttl: Duration::from_millis(ttl_ms),
                json,
            },
        ),
    }
}

/// Walk through the cache protocol
fn cmd_demo(config: &CacheConfig) -> Result<()> {
    println!("{}", "lcache demo".cyan().bold());

    let loads = Arc::new(AtomicUsize::new(0));
    let loader_loads = Arc::clone(&loads);
    let cache = LocalCache::with_loader(
        &config.clone().with_cleanup_interval(Duration::from_millis(50)),
        move |key: &str| -> std::result::Result<ExpireVal<String>, LoadError> {
            if key.is_empty() {
                return Err("empty key".into());
            }
            let n = loader_loads.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(ExpireVal::new(format!("{key} (load #{n})"), Duration::from_millis(150)))
        },
    );

    let first = cache.get("alice.eth")?;
    println!("  {} alice.eth -> {}", "miss".yellow(), first);
    let second = cache.get("alice.eth")?;
    println!("  {}  alice.eth -> {}", "hit".green(), second);

    cache.set("bob.eth", ExpireVal::never("set directly".to_string()));
    println!("  {}  bob.eth -> {}", "set".blue(), cache.get("bob.eth")?);

    cache.add([
        ("carol.eth", ExpireVal::never("bulk 1".to_string())),
        ("dave.eth", ExpireVal::never("bulk 2".to_string())),
    ]);
    println!("  {}  carol.eth -> {}", "add".blue(), cache.get("carol.eth")?);
    println!("  {}  dave.eth -> {}", "add".blue(), cache.get("dave.eth")?);

    match cache.get("") {
        Ok(v) => return Err(anyhow!("expected a loader failure, got {v}")),
        Err(e) => println!("  {} '' -> {}", "fail".red(), e),
    }

    thread::sleep(Duration::from_millis(250));
    let reloaded = cache.get("alice.eth")?;
    println!("  {} alice.eth -> {}", "expired".yellow(), reloaded);

    println!();
    print_stats(&cache.stats());
    println!("  loader calls: {}", loads.load(Ordering::SeqCst));
    Ok(())
}

struct BenchOptions {
    keys: usize,
    threads: usize,
    iterations: usize,
    latency: Duration,
    ttl: Duration,
    json: bool,
}

/// Concurrent load against one cache instance
fn cmd_bench(config: &CacheConfig, opts: BenchOptions) -> Result<()> {
    if opts.keys == 0 || opts.threads == 0 {
        return Err(anyhow!("--keys and --threads must be greater than zero"));
    }

    let latency = opts.latency;
    let ttl = opts.ttl;
    let cache = Arc::new(LocalCache::with_loader(
        config,
        move |key: &str| -> std::result::Result<ExpireVal<usize>, LoadError> {
            thread::sleep(latency);
            Ok(ExpireVal::new(key.len(), ttl))
        },
    ));

    info!(
        keys = opts.keys,
        threads = opts.threads,
        iterations = opts.iterations,
        "Starting bench"
    );
    let start = Instant::now();

    let handles: Vec<_> = (0..opts.threads)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let keys = opts.keys;
            let iterations = opts.iterations;
            thread::spawn(move || -> std::result::Result<(), lcache::CacheError> {
                for i in 0..iterations {
                    let key = format!("key-{}", (t * 31 + i) % keys);
                    cache.get(&key)?;
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow!("bench worker panicked"))?
            .context("bench lookup failed")?;
    }

    let elapsed = start.elapsed();
    let stats = cache.stats();

    if opts.json {
        let report = serde_json::json!({
            "elapsed_ms": elapsed.as_millis() as u64,
            "hits": stats.hits,
            "misses": stats.misses,
            "coalesced": stats.coalesced,
            "loads": stats.loads,
            "load_failures": stats.load_failures,
            "hit_ratio": stats.hit_ratio(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", "lcache bench".cyan().bold());
        println!("  elapsed: {:?}", elapsed);
        print_stats(&stats);
        let lookups = (opts.threads * opts.iterations) as f64;
        let secs = elapsed.as_secs_f64().max(f64::EPSILON);
        println!("  throughput: {:.0} lookups/s", lookups / secs);
    }
    Ok(())
}

fn print_stats(stats: &CacheStats) {
    println!("  hits: {}", stats.hits.to_string().green());
    println!("  misses: {}", stats.misses.to_string().yellow());
    println!("  coalesced: {}", stats.coalesced);
    println!("  loads: {}", stats.loads);
    println!("  load failures: {}", stats.load_failures.to_string().red());
    println!("  hit ratio: {:.1}%", stats.hit_ratio() * 100.0);
}
