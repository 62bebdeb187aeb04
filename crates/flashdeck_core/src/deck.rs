/// A single question/answer pair. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    question: String,
    answer: String,
}

/// Presentation split of a question: the prompt line plus any supplementary
/// lines (e.g. multiple-choice options), in original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionLines<'a> {
    pub prompt: &'a str,
    pub supplementary: Vec<&'a str>,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Splits the question on `\n` without touching the stored text.
    pub fn question_lines(&self) -> QuestionLines<'_> {
        let mut lines = self
            .question
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line));
        let prompt = lines.next().unwrap_or_default();
        QuestionLines {
            prompt,
            supplementary: lines.collect(),
        }
    }
}

/// Ordered cards from one generation request, in generation order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Deck {
    cards: Vec<Flashcard>,
}

impl Deck {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Flashcard> {
        self.cards.get(index)
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }
}

impl FromIterator<Flashcard> for Deck {
    fn from_iter<I: IntoIterator<Item = Flashcard>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
