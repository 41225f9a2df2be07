//! The `animind quiz` command.

use std::path::Path;

use anyhow::Result;

use animind_core::error::EngineError;
use animind_core::quiz::{Advance, QuizSession};

use crate::reporter::ConsoleReporter;

pub fn execute(
    config_path: Option<&Path>,
    topic: String,
    grade: Option<u8>,
    answers: Option<String>,
) -> Result<()> {
    let (config, engine) = super::open(config_path)?;
    let mut engine = engine.with_reporter(Box::new(ConsoleReporter));
    let bank = config.question_bank()?;
    let grade = grade.unwrap_or(engine.progress().current_grade);
    let mut quiz = engine.start_quiz(&bank, grade, &topic)?;

    if quiz.is_placeholder() {
        println!("No questions for grade {grade} topic '{topic}' yet.");
    }

    let mut input: Box<dyn Iterator<Item = String>> = match answers {
        Some(list) => Box::new(
            list.split(',')
                .map(|a| a.trim().to_string())
                .collect::<Vec<_>>()
                .into_iter(),
        ),
        None => Box::new(
            std::io::stdin()
                .lines()
                .map_while(|line| line.ok())
                .map(|line| line.trim().to_string()),
        ),
    };

    loop {
        print_question(&quiz);

        let Some(selected) = next_selection(&mut input, &quiz) else {
            println!(
                "\nStopped after {} of {} questions.",
                quiz.index(),
                quiz.total()
            );
            return Ok(());
        };
        engine.select_answer(&mut quiz, selected)?;
        engine.submit(&mut quiz)?;
        if let Some(question) = quiz.current_question() {
            if !question.explanation.is_empty() {
                println!("  {}", question.explanation);
            }
        }

        if engine.advance(&mut quiz)? == Advance::TopicComplete {
            break;
        }
    }

    println!(
        "Score: {}/{} correct, +{} coins this round.",
        quiz.correct_count(),
        quiz.total(),
        quiz.coins_earned()
    );
    Ok(())
}

fn print_question(quiz: &QuizSession) {
    let Some(question) = quiz.current_question() else {
        return;
    };
    println!(
        "\nQuestion {}/{} [{}, {} coins]",
        quiz.index() + 1,
        quiz.total(),
        question.difficulty,
        question.coins
    );
    if !question.animation.is_empty() {
        println!("  {}", question.animation);
    }
    println!("  {}", question.question);
    for (i, option) in question.options.iter().enumerate() {
        println!("    {i}) {option}");
    }
}

/// Pull answers until one is a usable option index. `None` when input runs out.
fn next_selection(
    input: &mut dyn Iterator<Item = String>,
    quiz: &QuizSession,
) -> Option<usize> {
    let options = quiz.current_question().map(|q| q.options.len()).unwrap_or(0);
    for raw in input {
        if raw.is_empty() {
            continue;
        }
        match raw.parse::<usize>() {
            Ok(index) if index < options => return Some(index),
            Ok(index) => eprintln!("{}", EngineError::OptionOutOfRange { index, options }),
            Err(_) => eprintln!("'{raw}' is not an option number"),
        }
    }
    None
}
