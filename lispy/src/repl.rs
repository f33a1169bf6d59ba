use crate::form::Form;
use crate::interpreter::Interpreter;
use crate::reader::{is_incomplete, Reader};
use rustyline::error::ReadlineError;

pub fn run(interp: &Interpreter, prompt: &str) -> rustyline::Result<()> {
    let mut rl = rustyline::DefaultEditor::new()?;
    let mut pending = String::new();
    loop {
        let line = match rl.readline(if pending.is_empty() { prompt } else { "... " }) {
            Err(ReadlineError::Interrupted) if !pending.is_empty() => {
                pending.clear();
                continue;
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(e),
            Ok(line) => line,
        };
        pending.push_str(&line);
        pending.push('\n');
        if is_incomplete(&pending) {
            continue;
        }
        let source = std::mem::take(&mut pending);
        if source.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(source.trim_end());
        // one bad form shouldn't end the session, only the rest of this input
        for form in Reader::new(&source) {
            match form.and_then(|form| interp.eval_top_level(&form)) {
                Ok(Form::Void) => (),
                Ok(value) => println!("{}", value),
                Err(e) => {
                    println!("{}", e);
                    break;
                },
            }
        }
    }
}
