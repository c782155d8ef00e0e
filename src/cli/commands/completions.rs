//! Shell completions generation.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::TodoError;

/// Generate the completion script for `shell`.
///
/// # Errors
///
/// Returns `InvalidInput` if the generated script is not valid UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, TodoError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "todoline", &mut buf);
    String::from_utf8(buf).map_err(|e| TodoError::InvalidInput(format!("UTF-8 error: {e}")))
}

/// How to install the completion script for `shell`.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => r"# Add to ~/.bashrc:
source <(todoline completions bash)
"
        .to_string(),

        Shell::Zsh => r"# Save to your fpath:
todoline completions zsh > ~/.zsh/completions/_todoline
# Then add to ~/.zshrc:
fpath=(~/.zsh/completions $fpath)
autoload -Uz compinit && compinit
"
        .to_string(),

        Shell::Fish => r"# Save to fish completions directory:
todoline completions fish > ~/.config/fish/completions/todoline.fish
"
        .to_string(),

        Shell::PowerShell => r"# Add to your PowerShell profile ($PROFILE):
todoline completions powershell | Out-String | Invoke-Expression
"
        .to_string(),

        Shell::Elvish => r"# Save to elvish completions directory:
todoline completions elvish > ~/.elvish/lib/todoline.elv
# Then add to ~/.elvish/rc.elv:
use todoline
"
        .to_string(),

        _ => format!("# Print the script with: todoline completions {shell}\n"),
    }
}

/// Execute the completions command.
///
/// # Errors
///
/// Returns an error if the script cannot be generated.
pub fn completions(shell: Shell, install: bool) -> Result<String, TodoError> {
    if install {
        Ok(completion_install_instructions(shell))
    } else {
        generate_completions(shell)
    }
}
