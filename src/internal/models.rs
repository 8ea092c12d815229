use serde::Deserialize;

/// Wire shape of one element of the `/dadjokes` response array.
/// Any extra fields the API adds are ignored.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiJoke {
    pub joke: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joke {
    pub text: String,
}

impl From<ApiJoke> for Joke {
    fn from(value: ApiJoke) -> Self {
        Self { text: value.joke }
    }
}

/// Ordered jokes returned by a single API call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JokeCollection {
    jokes: Vec<Joke>,
}

impl JokeCollection {
    pub fn new(jokes: Vec<Joke>) -> Self {
        Self { jokes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.jokes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jokes.len()
    }

    pub fn jokes(&self) -> &[Joke] {
        &self.jokes
    }

    /// All joke texts joined by a blank line, in response order.
    pub fn display_text(&self) -> String {
        self.jokes
            .iter()
            .map(|j| j.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl From<Vec<ApiJoke>> for JokeCollection {
    fn from(value: Vec<ApiJoke>) -> Self {
        Self::new(value.into_iter().map(Joke::from).collect())
    }
}

impl<S: Into<String>> FromIterator<S> for JokeCollection {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(|s| Joke { text: s.into() }).collect())
    }
}
