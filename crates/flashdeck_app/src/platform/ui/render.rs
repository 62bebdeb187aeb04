use std::io::{self, Write};

use chrono::Local;
use flashdeck_core::{AppViewModel, CardView, NoticeLevel, UploadView};

const PROGRESS_WIDTH: usize = 20;

pub fn render(out: &mut impl Write, view: &AppViewModel) -> io::Result<()> {
    let stamp = Local::now().format("%H:%M:%S");
    writeln!(out)?;
    writeln!(out, "---- {stamp} ----")?;
    for line in render_lines(view) {
        writeln!(out, "{line}")?;
    }
    write!(out, "> ")?;
    out.flush()
}

pub fn render_lines(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let file = if view.file_input.trim().is_empty() {
        "(none)"
    } else {
        view.file_input.as_str()
    };
    lines.push(format!("Document: {file}"));
    lines.push(format!("Upload:   {}", upload_status(&view.upload)));

    let topic = if view.topic_input.trim().is_empty() {
        "(none)"
    } else {
        view.topic_input.as_str()
    };
    let deck_state = if view.generating {
        "generating..."
    } else if view.generate_ready {
        "ready"
    } else {
        "idle"
    };
    lines.push(format!(
        "Topic:    {topic} | Cards: {} | Deck: {deck_state}",
        view.count_input
    ));

    lines.push(String::new());
    match &view.card {
        Some(card) => lines.extend(card_lines(card)),
        None => lines.push("No flashcards yet.".to_string()),
    }

    if let Some(notice) = &view.notice {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        lines.push(String::new());
        lines.push(format!("[{tag}] {}", notice.text));
    }

    lines
}

fn upload_status(upload: &UploadView) -> String {
    match upload {
        UploadView::Idle => "idle".to_string(),
        UploadView::Submitting { path } => format!("sending {path}"),
        UploadView::Processing { file_id, progress } => {
            format!("processing {file_id} {} {progress}%", progress_bar(*progress))
        }
        UploadView::Complete => format!("processed {}", progress_bar(100)),
        UploadView::Failed => "failed".to_string(),
    }
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * PROGRESS_WIDTH / 100;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled)
    )
}

fn card_lines(card: &CardView) -> Vec<String> {
    let mut lines = vec![
        format!("Question {} of {}", card.number, card.total),
        format!("  {}", card.prompt),
    ];
    lines.extend(card.supplementary.iter().map(|line| format!("    {line}")));
    match &card.answer {
        Some(answer) => lines.push(format!("Answer: {answer}")),
        None => lines.push("(flip to show the answer)".to_string()),
    }
    lines
}
