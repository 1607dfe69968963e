use anyhow::{Context, Result};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

/// Line oriented question/answer over an async reader and writer.
///
/// A session owns one `Prompt` and must `close` it when done.
pub struct Prompt<R, W> {
    reader: R,
    writer: W,
}

pub type StdioPrompt = Prompt<BufReader<Stdin>, Stdout>;

impl StdioPrompt {
    pub fn stdio() -> Self {
        Prompt::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Prompt<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Writes `question` and waits for the next line, without its line ending.
    ///
    /// Returns `None` once the input is exhausted.
    pub async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        self.writer.write_all(question.as_bytes()).await?;
        self.writer.flush().await?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .context("Failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    pub async fn say(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        Ok(())
    }

    pub async fn close(mut self) -> Result<()> {
        self.writer.flush().await.context("Failed to flush output")
    }
}
