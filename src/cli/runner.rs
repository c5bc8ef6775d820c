//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ServiceConfig;
use crate::cursor::{decode_jobs_cursor, encode_jobs_cursor, ContinuationToken, Cursor};
use crate::error::{Error, Result, ResultExt};
use crate::pagination::PageConnection;
use serde_json::{json, Value};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Page {
                status,
                query,
                limit,
                after,
            } => {
                self.page(status, query.clone(), *limit, after.as_deref())
                    .await
            }
            Commands::Walk {
                status,
                query,
                limit,
                max_pages,
            } => self.walk(status, query.clone(), *limit, *max_pages).await,
            Commands::EncodeCursor { raw } => {
                self.encode_cursor(raw);
                Ok(())
            }
            Commands::DecodeCursor { cursor } => self.decode_cursor(cursor),
        }
    }

    /// Resolve the service config from `--config` and `--base-url`
    fn load_config(&self) -> Result<ServiceConfig> {
        let mut config = match (&self.cli.config, &self.cli.base_url) {
            (Some(path), _) => ServiceConfig::from_file(path)
                .with_context(|| format!("Loading {}", path.display()))?,
            (None, Some(base_url)) => ServiceConfig::new(base_url),
            (None, None) => {
                return Err(Error::config(
                    "No service configured (use --config or --base-url)",
                ))
            }
        };

        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }
        config.validate()?;
        Ok(config)
    }

    async fn page(
        &self,
        status: &str,
        query: Option<String>,
        limit: Option<u32>,
        after: Option<&str>,
    ) -> Result<()> {
        let config = self.load_config()?;
        let backend = config.backend()?;
        let after = after.map(Cursor::from);

        let connection = backend.new_connection(
            status,
            query,
            limit.or(config.default_limit),
            after.as_ref(),
        )?;

        self.output(&render_page(&connection).await?);
        Ok(())
    }

    async fn walk(
        &self,
        status: &str,
        query: Option<String>,
        limit: Option<u32>,
        max_pages: usize,
    ) -> Result<()> {
        let config = self.load_config()?;
        let backend = config.backend()?;

        let mut connection =
            backend.new_connection(status, query, limit.or(config.default_limit), None)?;
        let mut pages = 0;

        loop {
            self.output(&render_page(&connection).await?);
            pages += 1;

            if max_pages > 0 && pages >= max_pages {
                info!("Stopping after {} pages", pages);
                break;
            }

            let next = connection.next_page().await?;
            match next {
                Some(next) => connection = next,
                None => {
                    info!("Reached last page after {} pages", pages);
                    break;
                }
            }
        }

        Ok(())
    }

    fn encode_cursor(&self, raw: &str) {
        let cursor = encode_jobs_cursor(&ContinuationToken::new(raw));
        self.output(&json!({ "cursor": cursor }));
    }

    fn decode_cursor(&self, cursor: &str) -> Result<()> {
        let token = decode_jobs_cursor(&Cursor::from(cursor))?;
        self.output(&json!({ "continuation": token }));
        Ok(())
    }

    /// Output a document
    fn output(&self, value: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(value).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            }
        }
    }
}

/// Render a page as `{ nodes, totalCount, pageInfo }`.
///
/// All three fields are read through their own accessor; the connection
/// fetches once.
pub async fn render_page(connection: &PageConnection) -> Result<Value> {
    let (nodes, total_count, page_info) = tokio::try_join!(
        connection.items(),
        connection.total_count(),
        connection.page_info()
    )?;

    Ok(json!({
        "nodes": nodes,
        "totalCount": total_count,
        "pageInfo": page_info,
    }))
}
