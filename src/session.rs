use crate::flows::Flow;
use crate::generate::GenerationClient;
use crate::wizard::{Screen, Wizard};
use anyhow::Result;
use inquire::{Confirm, Select, Text};
use log::info;

const TYPE_YOUR_OWN: &str = "Or type your own...";
const SKIP: &str = "Skip";

/// Drives one wizard pass (or several, across restarts) at the terminal.
pub struct Session {
    flow: Flow,
    client: Box<dyn GenerationClient>,
    wizard: Wizard,
}

impl Session {
    pub fn new(flow: Flow, client: Box<dyn GenerationClient>) -> Self {
        let wizard = Wizard::new(flow.questions.clone(), flow.restart_on_success);
        Self {
            flow,
            client,
            wizard,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("Starting {} flow", self.flow.name);

        loop {
            match self.wizard.screen() {
                Screen::Question {
                    index,
                    total,
                    prompt,
                    choices,
                    ..
                } => {
                    let mut options = choices;
                    options.push(TYPE_YOUR_OWN.to_string());
                    options.push(SKIP.to_string());

                    let header = format!("({}/{}) {}", index + 1, total, prompt);
                    let picked = Select::new(&header, options).prompt()?;

                    if picked == TYPE_YOUR_OWN {
                        let typed = Text::new("Your answer:").prompt()?;
                        self.wizard.set_draft(&typed);
                        if !self.wizard.commit_draft() {
                            println!("Nothing entered; pick an option or Skip.");
                        }
                    } else if picked == SKIP {
                        self.wizard.skip();
                    } else {
                        self.wizard.choose(&picked);
                    }
                }
                Screen::Generating => {
                    println!("{}", self.flow.progress_message);
                    settle_generation(&mut self.wizard, self.client.as_ref()).await;
                }
                Screen::Failure { message } => {
                    eprintln!("{}", message);
                    let again = Confirm::new("Try again?").with_default(true).prompt()?;
                    if again {
                        self.wizard.restart();
                    } else {
                        return Ok(());
                    }
                }
                Screen::Result {
                    text,
                    voice_url,
                    music_url,
                    restartable,
                } => {
                    println!("\n=== {} ===\n", self.flow.result_title);
                    println!("{}\n", text);
                    if let Some(voice) = voice_url {
                        println!("Guided voice:     {}", voice);
                    }
                    if let Some(music) = music_url {
                        println!("Background music: {}", music);
                    }

                    if restartable {
                        let again = Confirm::new("Start over?").with_default(false).prompt()?;
                        if again {
                            self.wizard.restart();
                            continue;
                        }
                    }
                    return Ok(());
                }
            }
        }
    }
}

/// Performs the one outbound call for a wizard that has reached
/// `Screen::Generating` and settles it with the outcome.
pub async fn settle_generation(wizard: &mut Wizard, client: &dyn GenerationClient) {
    let outcome = client.generate(wizard.answers()).await;
    wizard.resolve(outcome);
}
