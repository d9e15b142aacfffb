use crate::wizard::Question;
use anyhow::{anyhow, Result};

/// One questionnaire variant: its questions plus the strings and affordances
/// that differ between variants. The wizard itself is shared.
#[derive(Debug)]
pub struct Flow {
    pub name: &'static str,
    pub questions: Vec<Question>,
    pub progress_message: &'static str,
    pub result_title: &'static str,
    /// Whether the result screen offers a "start over" action. Only the
    /// visualization flow renders its result in place with one.
    pub restart_on_success: bool,
}

pub fn flow_for(name: &str) -> Result<Flow> {
    match name {
        "meditation" => Ok(Flow {
            name: "meditation",
            questions: coach_questions(),
            progress_message: "Generating your personalized meditation...",
            result_title: "Your Personalized Session",
            restart_on_success: false,
        }),
        "visualization" => Ok(Flow {
            name: "visualization",
            questions: coach_questions(),
            progress_message: "Generating your personalized visualization...",
            result_title: "Your Visualization Journey",
            restart_on_success: true,
        }),
        "mood_check" => Ok(Flow {
            name: "mood_check",
            questions: mood_questions(),
            progress_message: "Generating your visualization...",
            result_title: "Your Visualization",
            restart_on_success: false,
        }),
        _ => Err(anyhow!("Unknown flow: {}", name)),
    }
}

fn coach_questions() -> Vec<Question> {
    vec![
        Question::new(
            "emotion",
            "How are you feeling right now?",
            &["Happy", "Sad", "Anxious", "Calm", "Excited", "Tired"],
        ),
        Question::new(
            "focus",
            "What's been on your mind lately?",
            &[
                "Work",
                "Relationships",
                "Health",
                "Future",
                "Creativity",
                "Nothing much",
            ],
        ),
        Question::new(
            "dream",
            "What's one thing you wish was true in your life?",
            &[
                "Financial freedom",
                "Better relationships",
                "Career success",
                "Inner peace",
                "Good health",
                "More travel",
            ],
        ),
        Question::new(
            "desired_feeling",
            "What do you want to feel more of?",
            &[
                "Peace",
                "Joy",
                "Confidence",
                "Motivation",
                "Clarity",
                "Gratitude",
            ],
        ),
    ]
}

fn mood_questions() -> Vec<Question> {
    vec![Question::new(
        "emotion",
        "How are you feeling today?",
        &["Great", "Good", "Okay", "Sad", "Stressed"],
    )]
}
