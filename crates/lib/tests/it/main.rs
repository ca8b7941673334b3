/*! Integration tests for larkdata.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library surface:
 * - construct: Constructor prototypes, argument reconciliation, strategy fallback
 * - facade: Copy-on-write list and map wrappers
 * - rendering: The canonical textual form and JSON output
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("larkdata=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod construct;
mod facade;
mod helpers;
mod rendering;
