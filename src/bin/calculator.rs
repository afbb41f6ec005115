use cafezinho::calculator::Engine;
use std::io::Write;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    cafezinho::init_tracing();
    let engine = Engine::new()?;

    println!("Enter integer expressions such as '(3 + 4) * 5', '-7 % 3' or '!0'.");
    println!("Type 'quit' to exit.");

    loop {
        let mut line = String::new();

        print!("=> ");
        std::io::stdout().flush()?;

        if std::io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        match engine.evaluate(line) {
            Ok(v) => {
                println!("{v}");
            }
            Err(e) => {
                println!("ERROR: {e}");
            }
        }
    }

    Ok(())
}
