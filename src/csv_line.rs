// ✂️ CSV line tokenizer
//
// The spreadsheet export quotes fields that contain commas but never escapes
// quotes inside a field, so a double quote always toggles quoted mode.
// Whitespace is left alone; callers trim.

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Split one line of spreadsheet text into its fields.
///
/// Quote characters are consumed, not kept. An empty line yields a single
/// empty field; filtering blank lines is the caller's job.
///
/// # Examples:
/// ```
/// use bank_directory::csv_line::split_line;
///
/// assert_eq!(split_line(r#"Ana,"Rua A, 10",SP"#), vec!["Ana", "Rua A, 10", "SP"]);
/// ```
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            QUOTE => quoted = !quoted,
            DELIMITER if !quoted => fields.push(std::mem::take(&mut field)),
            _ => field.push(ch),
        }
    }

    // Trailing field has no delimiter after it
    fields.push(field);
    fields
}
