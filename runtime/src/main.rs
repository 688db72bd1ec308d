//! qmetric - metric filter over stdin/stdout
//!
//! Configuration comes from `QMETRIC_*` environment variables; see
//! [`qmetric_runtime::config`].

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    qmetric_runtime::run().await
}
