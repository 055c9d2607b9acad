// ABOUTME: Runs plugin containers as child processes of the container runtime CLI.
// ABOUTME: Wires the run context's streams to the child and records failures in the context.

mod context;
mod error;
mod stream;

pub use context::RunContext;
pub use error::{RunError, RunErrorKind};
pub use stream::{InputStream, OutputStream, SharedBuffer};

use snafu::OptionExt;
use std::io::{self, Read, Write};
use std::process::{Child, ChildStdin, Command};
use std::thread::{self, ScopedJoinHandle};

use crate::command::CommandBuilder;
use crate::manifest::ImageInfo;
use error::{EmptyCommandSnafu, ExitSnafu, TerminatedSnafu};

/// Executes container invocations rendered by a [`CommandBuilder`].
///
/// Every failure is both appended to the [`RunContext`] and returned.
/// Invocations block until the child exits; there is no timeout. An
/// [`InputStream::Reader`] must also stop blocking before a run returns.
#[derive(Debug, Clone, Default)]
pub struct ModuleRunner {
    builder: CommandBuilder,
}

impl ModuleRunner {
    pub fn new(builder: CommandBuilder) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &CommandBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut CommandBuilder {
        &mut self.builder
    }

    /// Run the container described by `info` on top of the builder's setup.
    pub fn run_image(&self, ctx: &mut RunContext, info: &ImageInfo) -> Result<(), RunError> {
        let cmd = match self.builder.build_from(info) {
            Ok(cmd) => cmd,
            Err(err) => {
                let err = RunError::from(err);
                ctx.add_error(err.clone());
                return Err(err);
            }
        };
        self.run_cmd(ctx, &cmd)
    }

    /// Run exactly what the builder is configured to produce.
    pub fn run(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let cmd = self.builder.build();
        self.run_cmd(ctx, &cmd)
    }

    fn run_cmd(&self, ctx: &mut RunContext, cmd: &str) -> Result<(), RunError> {
        tracing::info!("running command: {cmd}");
        ctx.reset();

        let result = execute(ctx, cmd);
        if let Err(err) = &result {
            if let Some(code) = err.exit_code() {
                ctx.set_last_exit_code(code);
            }
            tracing::warn!("command failed: {err}");
            ctx.add_error(err.clone());
        }
        result
    }
}

fn execute(ctx: &mut RunContext, cmd: &str) -> Result<(), RunError> {
    // Whitespace splitting: quoted values are not kept together.
    let mut tokens = cmd.split_whitespace();
    let program = tokens.next().context(EmptyCommandSnafu)?;

    let mut child = Command::new(program)
        .args(tokens)
        .stdin(ctx.input.stdio())
        .stdout(ctx.output.stdio())
        .stderr(ctx.error.stdio())
        .spawn()
        .map_err(|e| RunError::Spawn {
            program: program.to_string(),
            kind: e.kind(),
            message: e.to_string(),
        })?;

    let streamed = pump_stdio(ctx, &mut child);
    let status = child.wait().map_err(|e| RunError::Spawn {
        program: program.to_string(),
        kind: e.kind(),
        message: format!("failed to wait for child: {e}"),
    })?;

    match status.code() {
        Some(0) => {}
        Some(code) => return ExitSnafu { program, code }.fail(),
        None => return TerminatedSnafu { program }.fail(),
    }

    streamed.map_err(|(stream, e)| RunError::Stream {
        program: program.to_string(),
        stream,
        message: e.to_string(),
    })
}

type StreamResult = Result<(), (&'static str, io::Error)>;

/// Copy between the context's readers/writers and the child's pipes until
/// the child closes them.
fn pump_stdio(ctx: &mut RunContext, child: &mut Child) -> StreamResult {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    thread::scope(|scope| {
        let feeder = match (&mut ctx.input, stdin) {
            (InputStream::Reader(reader), Some(pipe)) => {
                Some(scope.spawn(move || feed(reader.as_mut(), pipe)))
            }
            _ => None,
        };
        let out = match (&mut ctx.output, stdout) {
            (OutputStream::Writer(writer), Some(mut pipe)) => {
                Some(scope.spawn(move || drain(&mut pipe, writer.as_mut())))
            }
            _ => None,
        };
        let err = match (&mut ctx.error, stderr) {
            (OutputStream::Writer(writer), Some(mut pipe)) => {
                Some(scope.spawn(move || drain(&mut pipe, writer.as_mut())))
            }
            _ => None,
        };

        let results = [
            join_stream("stdin", feeder),
            join_stream("stdout", out),
            join_stream("stderr", err),
        ];
        results.into_iter().collect::<StreamResult>()
    })
}

fn feed(reader: &mut (dyn Read + Send), mut pipe: ChildStdin) -> io::Result<()> {
    match io::copy(reader, &mut pipe) {
        Ok(_) => Ok(()),
        // The child is free to exit without reading its input.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e),
    }
}

fn drain(pipe: &mut dyn Read, writer: &mut (dyn Write + Send)) -> io::Result<()> {
    io::copy(pipe, writer)?;
    writer.flush()
}

fn join_stream(
    name: &'static str,
    handle: Option<ScopedJoinHandle<'_, io::Result<()>>>,
) -> StreamResult {
    let Some(handle) = handle else {
        return Ok(());
    };
    match handle.join() {
        Ok(result) => result.map_err(|e| (name, e)),
        Err(_) => Err((name, io::Error::other("stream copy thread panicked"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CliDefaults;

    fn runner(path: &str, cmd: &str) -> ModuleRunner {
        ModuleRunner::new(CommandBuilder::new(Some(
            CliDefaults::default().path(path).cmd(cmd),
        )))
    }

    #[test]
    fn empty_command_is_rejected() {
        let mut ctx = RunContext::default();
        let err = execute(&mut ctx, "   ").unwrap_err();
        assert_eq!(err, RunError::EmptyCommand);
    }

    #[test]
    fn successful_run_leaves_context_clean() {
        let mut ctx = RunContext::default();
        runner("true", "run").run(&mut ctx).unwrap();
        assert!(!ctx.is_errored());
    }

    #[test]
    fn failed_run_is_recorded_and_returned() {
        let mut ctx = RunContext::default();
        let err = runner("false", "run").run(&mut ctx).unwrap_err();

        assert_eq!(err.exit_code(), Some(1));
        assert_eq!(ctx.last_exit_code(), 1);
        assert_eq!(ctx.errors(), &[err]);
    }

    #[test]
    fn unsupported_command_is_recorded_without_running() {
        let mut ctx = RunContext::default();
        let mut info = ImageInfo::new("img");
        info.command = vec!["echo".to_string()];

        let err = runner("true", "run").run_image(&mut ctx, &info).unwrap_err();
        assert_eq!(err.to_string(), "command is not yet supported");
        assert_eq!(ctx.errors().len(), 1);
        assert_eq!(ctx.last_exit_code(), 0);
    }
}
