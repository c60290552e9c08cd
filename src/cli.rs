use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    // RUST_LOG=envflag=debug shows which flags were taken from the environment
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .try_init();

    let (foo, bar, list) = {
        let mut flags = envflag::command_line();
        (
            flags.define("foo", String::from("asdf"), "some string param"),
            flags.define("bar", 123i64, "some int param"),
            flags.define("list-flags", false, "print every flag and where it stands"),
        )
    };

    envflag::parse();

    println!("foo {}", foo.get());
    println!("bar {}", bar.get());

    if list.get() {
        let flags = envflag::command_line();
        println!();
        for info in flags.info() {
            println!(
                "{:<12} env={:<24} default={:<8} current={}",
                info.name,
                envflag::env_key(flags.name(), &info.name),
                info.default,
                info.current
            );
        }
        if !flags.args().is_empty() {
            println!("args {:?}", flags.args());
        }
    }
}
