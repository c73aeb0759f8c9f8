mod highlighter;

use clap::Parser;
use highlighter::MalHelper;
use mal::core::base_environment;
use mal::env::Environment;
use mal::error::EvalError;
use mal::eval::eval;
use mal::printer::pr_str;
use mal::reader::{read_str, ReadError};
use mal::value::Value;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use std::rc::Rc;

/// Mal (Make-A-Lisp) interpreter
#[derive(Parser, Debug)]
#[command(name = "mal")]
#[command(version)]
#[command(about = "A Mal (Make-A-Lisp) interpreter with TCO, macros, and a REPL")]
struct CliArgs {
    /// Script file to execute (optional - if not provided, starts REPL)
    #[arg(value_name = "FILE")]
    script: Option<String>,

    /// Arguments exposed to the script as *ARGV*
    #[arg(value_name = "ARGS", trailing_var_arg = true)]
    args: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliArgs::parse();

    let env = base_environment(&cli.args)?;

    // Script mode: load the file and exit
    if let Some(script) = cli.script {
        let form = Value::list(vec![Value::sym("load-file"), Value::Str(script)]);
        if let Err(e) = eval(form, env) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    // REPL mode: interactive loop with history and syntax highlighting
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<MalHelper, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(MalHelper::new()));

    let history_file = ".mal-history";
    let _ = rl.load_history(history_file);

    // The banner goes through the interpreter itself
    let _ = rep(r#"(println (str "Mal [" *host-language* "]"))"#, &env);

    loop {
        match rl.readline("user> ") {
            Ok(line) => match read_str(&line) {
                // Blank and comment-only lines re-prompt silently
                Err(ReadError::EmptyInput) => continue,
                Err(e) => eprintln!("Error: {}", e),
                Ok(ast) => match eval(ast, env.clone()) {
                    Ok(value) => println!("{}", pr_str(&value, true)),
                    Err(e) => eprintln!("Error: {}", e),
                },
            },
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("EOF");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);

    Ok(())
}

/// Read, evaluate, and print one form
fn rep(line: &str, env: &Rc<Environment>) -> Result<String, EvalError> {
    let ast = read_str(line).map_err(|e| EvalError::Syntax(e.to_string()))?;
    Ok(pr_str(&eval(ast, env.clone())?, true))
}
