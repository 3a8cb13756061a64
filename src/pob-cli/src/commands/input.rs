//! Reading export codes and documents from arguments, files, or stdin

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::cli::CodeInput;

/// Resolve the export code named by the arguments
pub fn read_code(input: &CodeInput) -> Result<String> {
    read_code_from(input, std::io::stdin().lock())
}

/// [`read_code`] with an explicit stdin
pub fn read_code_from(input: &CodeInput, mut stdin: impl Read) -> Result<String> {
    let code = if let Some(path) = &input.file {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read export code from {}", path.display()))?
    } else {
        match input.code.as_deref() {
            Some("-") => {
                let mut buf = String::new();
                stdin
                    .read_to_string(&mut buf)
                    .context("Failed to read export code from stdin")?;
                buf
            }
            Some(code) => code.to_string(),
            None => bail!("No export code given. Pass it as an argument, - for stdin, or --file."),
        }
    };

    let code = code.trim().to_string();
    if code.is_empty() {
        bail!("Export code is empty");
    }
    Ok(code)
}

/// Read a text file, or stdin when the path is `-`
pub fn read_text(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .lock()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn arg(code: &str) -> CodeInput {
        CodeInput {
            code: Some(code.to_string()),
            file: None,
        }
    }

    #[test]
    fn test_code_from_argument() {
        let code = read_code_from(&arg("  eNrabc \n"), std::io::empty()).unwrap();
        assert_eq!(code, "eNrabc");
    }

    #[test]
    fn test_code_from_stdin() {
        let code = read_code_from(&arg("-"), "eNrstdin\n".as_bytes()).unwrap();
        assert_eq!(code, "eNrstdin");
    }

    #[test]
    fn test_code_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.txt");
        fs::write(&path, "eNrfile\n").unwrap();
        let input = CodeInput {
            code: None,
            file: Some(path),
        };
        assert_eq!(read_code_from(&input, std::io::empty()).unwrap(), "eNrfile");
    }

    #[test]
    fn test_missing_or_empty_code() {
        assert!(read_code_from(&CodeInput::default(), std::io::empty()).is_err());
        assert!(read_code_from(&arg("-"), "  \n".as_bytes()).is_err());
        let input = CodeInput {
            code: None,
            file: Some(PathBuf::from("/nonexistent/code.txt")),
        };
        assert!(read_code_from(&input, std::io::empty()).is_err());
    }
}
