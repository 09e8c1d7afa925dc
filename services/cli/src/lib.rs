mod cli;
mod infra;

use deal_engine::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
