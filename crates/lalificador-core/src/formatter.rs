use std::fmt;
use std::str::FromStr;

use regex::Regex;
use tracing::debug;

use crate::period::Period;
use crate::LalificadorError;

pub const DEFAULT_ORG_CODE: &str = "XXX";

const CONFORMANT_PATTERN: &str = concat!(
    r"^\d{4}-\d{2}\s",
    r"\d{3}\.\s",
    r"([A-Z][a-z0-9]*_)*",
    r"[A-Z][a-z0-9]*\s",
    r"(\([^)]+\)\s)?",
    r"(F\.[A-Za-z0-9]{1,5}\s)?",
    r"[A-Z0-9]{2,}$",
);

/// Trailing tag identifying the owner of a document, e.g. `HBO`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgCode(String);

impl OrgCode {
    /// Builds an org code from user input. Blank input selects the default code.
    pub fn new(raw: &str) -> Result<Self, LalificadorError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        if trimmed
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control())
        {
            return Err(LalificadorError::InvalidOrgCode {
                value: raw.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The form that ends every normalized name.
    pub fn to_upper(&self) -> String {
        self.0.to_uppercase()
    }
}

impl Default for OrgCode {
    fn default() -> Self {
        Self(DEFAULT_ORG_CODE.to_string())
    }
}

impl fmt::Display for OrgCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OrgCode {
    type Err = LalificadorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Splits a file name into stem and extension. The extension keeps its dot and
/// only exists when the last dot is neither the first nor the last character.
pub fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(index) if index > 0 && index < file_name.len() - 1 => {
            (&file_name[..index], &file_name[index..])
        }
        _ => (file_name, ""),
    }
}

pub fn pad_sequence(number: u16) -> String {
    format!("{:03}", number)
}

/// Normalizes an invoice payload (the part after `F.`) to five characters.
pub fn normalize_invoice_code(payload: &str) -> String {
    if payload.chars().all(|c| c.is_ascii_digit()) {
        format!("F.{:0>5}", payload)
    } else {
        format!("F.{:0>5}", payload.to_uppercase())
    }
}

/// Upper-cases every letter that starts a run of letters, leaving the rest alone.
pub fn title_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut previous_alphabetic = false;
    for c in text.chars() {
        if c.is_alphabetic() && !previous_alphabetic {
            output.extend(c.to_uppercase());
        } else {
            output.push(c);
        }
        previous_alphabetic = c.is_alphabetic();
    }
    output
}

/// Leading `NN.` token of a non-conformant stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadingNumber<'a> {
    pub sequence: String,
    pub rest: &'a str,
}

/// Invoice code pulled out of the free text, plus what is left once every
/// `F.xxxxx` occurrence is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceExtraction {
    pub code: Option<String>,
    pub remainder: String,
}

pub struct FilenameFormatter {
    org: OrgCode,
    conformant: Regex,
    stamped: Regex,
    numbered: Regex,
    comment: Regex,
    invoice: Regex,
    noise: Regex,
    non_word: Regex,
    whitespace: Regex,
}

impl FilenameFormatter {
    pub fn new(org: OrgCode) -> Result<Self, regex::Error> {
        let noise = Regex::new(&format!(
            r"(?i)[0-9]{{4}}-[0-9]{{2}}|{}",
            regex::escape(org.as_str())
        ))?;
        let stamped = Regex::new(&format!(
            r"^\d{{4}}-\d{{2}} (\d{{3}}\. \w*(?: \([^)]*\))?(?: F\.[A-Za-z0-9]{{5}})?) {}$",
            regex::escape(&org.to_upper())
        ))?;
        Ok(Self {
            org,
            conformant: Regex::new(CONFORMANT_PATTERN)?,
            stamped,
            numbered: Regex::new(r"^([0-9]{1,3})\.\s*(.*)$")?,
            comment: Regex::new(r"\(([^)]*)\)")?,
            invoice: Regex::new(r"F\.([A-Za-z0-9]{1,5})")?,
            noise,
            non_word: Regex::new(r"\W+")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// Computes the normalized name for `file_name`. Conformant names come back
    /// unchanged, extension case included.
    pub fn format(&self, file_name: &str, period: &Period) -> String {
        let (stem, extension) = split_name(file_name);

        if self.is_conformant(stem) {
            debug!("Already conformant: '{}'", file_name);
            return file_name.to_string();
        }

        let extension = extension.to_lowercase();
        let formatted = if let Some(body) = self.parse_stamped(stem) {
            format!("{} {} {}{}", period, body, self.org.to_upper(), extension)
        } else {
            match self.parse_leading_number(stem) {
                Some(leading) => self.format_numbered(&leading, period, &extension),
                None => self.format_unnumbered(stem, period, &extension),
            }
        };

        debug!("Formatted '{}' -> '{}'", file_name, formatted);
        formatted
    }

    pub fn is_conformant(&self, stem: &str) -> bool {
        self.conformant.is_match(stem)
    }

    /// Body of a name this formatter already produced (`NNN. Free_Text (comment)
    /// F.XXXXX`) that the strict check rejects, e.g. because a word keeps an
    /// uppercase tail. Only the period and org code around it get replaced.
    pub fn parse_stamped<'a>(&self, stem: &'a str) -> Option<&'a str> {
        self.stamped
            .captures(stem)
            .and_then(|caps| caps.get(1))
            .map(|body| body.as_str())
    }

    pub fn parse_leading_number<'a>(&self, stem: &'a str) -> Option<LeadingNumber<'a>> {
        let caps = self.numbered.captures(stem)?;
        let number = caps.get(1)?.as_str().parse::<u16>().ok()?;
        let rest = caps.get(2).map_or("", |m| m.as_str());
        Some(LeadingNumber {
            sequence: pad_sequence(number),
            rest,
        })
    }

    /// First parenthetical in `rest`, interior trimmed, parentheses kept.
    pub fn extract_comment(&self, rest: &str) -> Option<String> {
        self.comment
            .captures(rest)
            .and_then(|caps| caps.get(1))
            .map(|inner| format!("({})", inner.as_str().trim()))
    }

    /// Searches `rest` as given, parentheticals included, so a code written inside
    /// the comment is both kept in the comment and reported as the invoice code.
    pub fn extract_invoice_code(&self, rest: &str) -> InvoiceExtraction {
        match self.invoice.captures(rest).and_then(|caps| caps.get(1)) {
            Some(payload) => InvoiceExtraction {
                code: Some(normalize_invoice_code(payload.as_str())),
                remainder: self.invoice.replace_all(rest, "").into_owned(),
            },
            None => InvoiceExtraction {
                code: None,
                remainder: rest.to_string(),
            },
        }
    }

    /// Turns what is left after extraction into `Title_Case_Words`.
    pub fn clean_free_text(&self, remainder: &str) -> String {
        let without_comments = self.comment.replace_all(remainder, "");
        let without_noise = self.noise.replace_all(&without_comments, "");
        let words = self.non_word.replace_all(&without_noise, " ");
        let collapsed = self.whitespace.replace_all(words.trim(), " ");
        title_case(&collapsed).replace(' ', "_")
    }

    /// Free text for a stem with no leading number: dates and the org code are
    /// removed, whitespace collapsed, casing untouched.
    pub fn clean_unnumbered(&self, stem: &str) -> String {
        let without_noise = self.noise.replace_all(stem, "");
        self.whitespace
            .replace_all(&without_noise, " ")
            .trim()
            .to_string()
    }

    fn format_numbered(&self, leading: &LeadingNumber<'_>, period: &Period, extension: &str) -> String {
        let comment = self.extract_comment(leading.rest);
        let invoice = self.extract_invoice_code(leading.rest);
        let free_text = self.clean_free_text(&invoice.remainder);

        let head = format!("{} {}. {}", period, leading.sequence, free_text);
        let mut parts = vec![head.trim_matches(|c: char| c == '.' || c == '_').to_string()];
        parts.extend(comment);
        parts.extend(invoice.code);
        parts.push(self.org.to_upper());

        format!("{}{}", parts.join(" "), extension)
    }

    fn format_unnumbered(&self, stem: &str, period: &Period, extension: &str) -> String {
        format!(
            "{} {} {}{}",
            period,
            self.clean_unnumbered(stem),
            self.org.to_upper(),
            extension
        )
    }
}
