use clap::{error::ErrorKind, CommandFactory, Parser};
use text_pipeline::utils::logger;
use text_pipeline::{CliConfig, PipelineError};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    let stdin = std::io::stdin();
    let input = match config.resolve_input(stdin.lock()) {
        Ok(input) => input,
        Err(PipelineError::MissingInputError) => {
            tracing::debug!("No argument and nothing on standard input");
            // clap 會印出 usage 並以非零碼結束
            CliConfig::command()
                .error(
                    ErrorKind::MissingRequiredArgument,
                    "no input text: pass TEXT or pipe one line on standard input",
                )
                .exit()
        }
        Err(e) => {
            tracing::error!("❌ Failed to read input: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    let output = config.render(&input);
    tracing::debug!("{:?} -> {:?}", input, output);
    println!("{}", output);
}
