use std::sync::Arc;

use app::AppBuilder;
use clap::Parser;
use color_eyre::Result;
use todo::{errors, Cli, Console, Session, TodoApp};

#[tokio::main]
pub async fn main() -> Result<()> {
    let args = Cli::parse();
    let ctx = AppBuilder::<TodoApp>::new(env!("CARGO_PKG_VERSION"))?
        .data_dir(args.data_dir)
        .verbose(args.verbose)
        .build()?;
    errors::init(ctx.data_dir())?;

    let session = Session::open(ctx.config(), Arc::new(Console::stdout())).await?;
    session.run(args.cmd).await
}
