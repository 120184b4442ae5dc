//! Defaults command implementation
//!
//! Prints a parameter file holding the default values.

use crate::config::ParameterFile;
use crate::Result;

/// Render the default parameter file
pub fn render() -> Result<String> {
    let body = ParameterFile::default().to_toml()?;
    Ok(format!("# slab parameter file\n\n{}", body))
}

/// Run the defaults command
pub fn run() -> Result<()> {
    print!("{}", render()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_defaults_parse_back() {
        let text = render().unwrap();
        assert!(text.starts_with("# slab parameter file"));
        assert_eq!(ParameterFile::parse(&text).unwrap(), ParameterFile::default());
    }
}
