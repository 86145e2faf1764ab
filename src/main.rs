use std::process::ExitCode;

fn main() -> ExitCode {
    health_assistant_lib::run()
}
