use colored::*;

use crate::terminal::print;

const BANNER_0: &str = r#"
         ▄▄▄▄▄▄▄ ▄▄▄▄▄▄▄ ▄▄▄▄▄▄▄ ▄▄▄▄▄▄▄ ▄▄▄▄▄▄▄ ▄▄▄▄▄▄
        █       █       █       █       █       █   ▄  █
        █  ▄▄▄▄▄█       █   ▄   █    ▄  █    ▄▄▄█  █ █ █
        █ █▄▄▄▄▄█     ▄▄█  █ █  █   █▄█ █   █▄▄▄█   █▄▄█▄
        █▄▄▄▄▄  █    █  █  █▄█  █    ▄▄▄█    ▄▄▄█    ▄▄  █
         ▄▄▄▄▄█ █    █▄▄█       █   █   █   █▄▄▄█   █  █ █
        █▄▄▄▄▄▄▄█▄▄▄▄▄▄▄█▄▄▄▄▄▄▄█▄▄▄█   █▄▄▄▄▄▄▄█▄▄▄█  █▄█
"#;

const BANNER_1: &str = r#"
          ___       ___       ___       ___       ___       ___
         /\  \     /\  \     /\  \     /\  \     /\  \     /\  \
        /::\  \   /::\  \   /::\  \   /::\  \   /::\  \   /::\  \
       /\:\:\__\ /:/\:\__\ /:/\:\__\ /::\:\__\ /::\:\__\ /::\:\__\
       \:\:\/__/ \:\ \/__/ \:\/:/  / \/\::/  / \:\:\/  / \;:::/  /
        \::/  /   \:\__\    \::/  /     \/__/   \:\/  /   |:\/__/
         \/__/     \/__/     \/__/               \/__/     \|__|
"#;

pub fn print() {
    let art: ColoredString = match rand::random_range(0..=1) {
        0 => BANNER_0.red(),
        _ => BANNER_1.green(),
    };
    print::print(&art.to_string());
}
