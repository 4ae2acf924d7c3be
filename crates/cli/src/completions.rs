// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tenure completions <shell>` - print a completion script
//!
//! ```bash
//! tenure completions bash > ~/.local/share/bash-completion/completions/tenure
//! tenure completions zsh > ~/.zfunc/_tenure
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

pub fn generate_completions<C: CommandFactory>(shell: Shell) {
    let mut cmd = C::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}
