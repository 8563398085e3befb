use ariadne::Source;
use genfun_algebra::ExtendedRationalFunction;
use genfun_automata::Nfa;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs::File, io::{self, BufReader, IsTerminal, Read}, process::ExitCode};

/// Runs the whole pipeline on one regular expression, printing the generating function of its
/// language and the partial-fraction form of that function.
fn evaluate(input: &str) -> Result<(), genfun_error::Error> {
    let mut nfa = Nfa::compile(input)?;
    nfa.remove_epsilon_transitions();
    let dfa = nfa.to_dfa().minimize();
    let function = dfa.generating_function();

    println!("Generating function:");
    println!("{}", function);
    println!("Partial fractions:");
    println!("{}", ExtendedRationalFunction::new(function));
    Ok(())
}

/// Reports an error to stderr.
///
/// The `ariadne` crate's [`Report`](ariadne::Report) type does not have a `Display`
/// implementation, so its `eprint` method is the only way to get it there.
fn report_to_stderr(err: &genfun_error::Error, input: &str) {
    err.build_report("input")
        .eprint(("input", Source::from(input)))
        .unwrap();
}

/// Evaluates one expression from a file or piped stdin, failing the process if it is invalid.
fn execute(input: &str) -> ExitCode {
    match evaluate(input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_to_stderr(&err, input);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // run source file
        let mut file = BufReader::new(File::open(filename).unwrap());
        let mut input = String::new();
        file.read_to_string(&mut input).unwrap();

        execute(&input)
    } else if !io::stdin().is_terminal() {
        // read source from stdin
        let mut input = String::new();
        io::stdin().read_to_string(&mut input).unwrap();

        execute(&input)
    } else {
        // run the repl / interactive mode
        let mut rl = DefaultEditor::new().unwrap();

        fn process_line(rl: &mut DefaultEditor) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            if let Err(err) = evaluate(&input) {
                report_to_stderr(&err, &input);
            }
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
        ExitCode::SUCCESS
    }
}
