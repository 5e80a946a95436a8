use clap::Parser;
use mimalloc::MiMalloc;
use technotes::{Config, cli::Cli, init_tracing, run};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, source) = Config::load()?;
    init_tracing(&config);
    source.log();

    if cli.run_offline(&config)? {
        return Ok(());
    }

    let worker_threads = config.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(run(config))
}
