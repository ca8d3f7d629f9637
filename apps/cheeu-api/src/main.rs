use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = cheeu_api::Args::parse();
	cheeu_api::run(args).await
}
