/// Wrap joke text to `width` columns, keeping blank lines between jokes.
/// A zero width is treated as one column.
pub fn wrap_joke(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    text.split('\n')
        .flat_map(|paragraph| match paragraph.is_empty() {
            true => vec![String::new()],
            false => textwrap::wrap(paragraph, width)
                .into_iter()
                .map(|line| line.into_owned())
                .collect(),
        })
        .collect()
}
