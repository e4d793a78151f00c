use anyhow::Result;
use owo_colors::OwoColorize;
use sodapop_core::app::App;

use crate::render::{Render, render_card};

pub async fn run(app: &App, start_over: bool) -> Result<()> {
    let mut feed = app.feed();
    let deck = if start_over {
        feed.start_over().await
    } else {
        feed.load().await
    };

    let Some((top, rest)) = deck.split_first() else {
        println!("{}", "You're all caught up!".bold());
        println!(
            "{}",
            "Run `sodapop feed --start-over` to see everything again.".dimmed()
        );
        return Ok(());
    };

    println!("{}", render_card(top));

    if !rest.is_empty() {
        println!();
        println!("{}", format!("Up next ({}):", rest.len()).dimmed());
        for event in rest {
            println!("  {}", event.render());
        }
    }

    println!();
    println!(
        "{}",
        "`sodapop save` to keep the top card, `sodapop pass` to skip it.".dimmed()
    );

    Ok(())
}
