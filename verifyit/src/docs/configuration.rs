//! # Configuring VerifyIt
//!
//! Settings are layered from `config/*.yaml` files and environment variables.
//! See [`verifyit_settings`](../../../verifyit_settings/index.html) for the
//! full order of precedence.
//!
//! The only value that must be provided is the search provider's API key.
//! Any of these work:
//!
//! ```shell
//! export VERIFYIT_SEARCH__API_KEY=...
//! export SERP_API_KEY=...
//! echo "SERP_API_KEY=..." > .env
//! ```
//!
//! Other commonly changed settings:
//!
//! | setting | environment variable | default |
//! |---|---|---|
//! | `http.listen` | `VERIFYIT_HTTP__LISTEN` | `127.0.0.1:8000` |
//! | `http.workers` | `VERIFYIT_HTTP__WORKERS` | one per core |
//! | `search.engine` | `VERIFYIT_SEARCH__ENGINE` | `google` |
//! | `search.timeout_sec` | `VERIFYIT_SEARCH__TIMEOUT_SEC` | HTTP client default |
//! | `logging.levels` | `VERIFYIT_LOGGING__LEVELS` | `INFO` |
//! | `logging.format` | `VERIFYIT_LOGGING__FORMAT` | `pretty` |
