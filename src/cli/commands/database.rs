use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::Database;

pub async fn migrate(database: &Database, output_format: &OutputFormat) -> anyhow::Result<()> {
    database.migrate().await?;
    output_success(output_format, "Database schema is up to date.", None)
}
