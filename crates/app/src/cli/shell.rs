use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use arturia_app::{
    context::AppContext,
    session::{Command, Flow, Session},
};

use super::CliError;

pub(crate) async fn run<R>(
    context: AppContext,
    input: R,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
{
    let mut session = Session::new(context);
    let mut lines = input.lines();

    writeln!(out, "Welcome to Arturia Store. Type 'help' for commands.")?;

    session.handle(Command::Catalog, out).await?;

    loop {
        write!(out, "{}", session.prompt())?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(error) => {
                writeln!(out, "{error}")?;
                continue;
            }
        };

        match session.handle(command, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(error) => {
                warn!(%error, "command failed");
                writeln!(out, "Error: {error}")?;
            }
        }
    }

    Ok(())
}
