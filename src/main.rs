mod app;
mod config;
mod engine;
mod picker;
mod runtime;
mod session;
mod tags;
mod timeline;
mod ui;

#[cfg(test)]
mod test_support;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
