//! Resume profile builder
//!
//! Turns decoded resume text into a structured `ResumeProfile`: contact
//! details, section-sliced skills, experience entries with tenure, education
//! entries, and a 0-5 parse quality grade used by format scoring and
//! confidence estimation. Plain text only; decoding other formats happens
//! upstream.

use crate::error::{Result, ResumeScorerError};
use crate::extraction::fallback::{is_word_bounded, technology_vocabulary};
use crate::model::{
    ContactInfo, EducationEntry, EducationLevel, ExperienceEntry, ResumeProfile,
};
use aho_corasick::AhoCorasick;
use chrono::Datelike;
use log::debug;
use regex::Regex;

const SKILLS_HEADERS: &[&str] = &["skills", "technical skills", "core competencies", "technologies"];
const EXPERIENCE_HEADERS: &[&str] = &[
    "experience",
    "work experience",
    "professional experience",
    "employment",
    "work history",
];
const EDUCATION_HEADERS: &[&str] = &["education", "academic background", "qualifications"];
const SUMMARY_HEADERS: &[&str] = &["summary", "profile", "objective", "about"];

/// Minimum word count for the length component of parse quality.
const MIN_REASONABLE_WORDS: usize = 50;

pub struct ProfileBuilder {
    email_regex: Regex,
    phone_regex: Regex,
    total_years_regex: Regex,
    date_range_regex: Regex,
    degree_regex: Regex,
    vocabulary: Vec<&'static str>,
    vocab_matcher: AhoCorasick,
}

impl ProfileBuilder {
    pub fn new() -> Result<Self> {
        let vocabulary = technology_vocabulary();
        let vocab_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(aho_corasick::MatchKind::LeftmostLongest)
            .build(&vocabulary)
            .map_err(|e| {
                ResumeScorerError::InvalidInput(format!(
                    "Failed to build vocabulary matcher: {}",
                    e
                ))
            })?;

        Ok(Self {
            email_regex: Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
                .map_err(invalid_pattern)?,
            // No leading \b: there is no word boundary before "(", and the
            // match must include the opening parenthesis.
            phone_regex: Regex::new(
                r"(?:\+?1[-. ]?)?\(?[0-9]{3}\)?[-. ]?[0-9]{3}[-. ]?[0-9]{4}\b",
            )
            .map_err(invalid_pattern)?,
            total_years_regex: Regex::new(r"(?i)(\d{1,2})\+?\s*years?\s+(?:of\s+)?experience")
                .map_err(invalid_pattern)?,
            date_range_regex: Regex::new(
                r"(?i)\b((?:19|20)\d{2})\s*(?:-|–|to)\s*((?:19|20)\d{2}|present|current)",
            )
            .map_err(invalid_pattern)?,
            degree_regex: Regex::new(
                r"(?i)\b(ph\.?d|doctorate|master(?:'?s)?|m\.?s\.?c?|mba|bachelor(?:'?s)?|b\.?s\.?c?|b\.?a\.|associate(?:'?s)?|diploma)\b",
            )
            .map_err(invalid_pattern)?,
            vocabulary,
            vocab_matcher,
        })
    }

    /// Build a profile from decoded resume text. Partial resumes are fine;
    /// anything not found stays empty and drags down parse quality instead
    /// of failing.
    pub fn build(&self, text: &str) -> ResumeProfile {
        let contact = self.extract_contact(text);
        let skills = self.extract_skills(text);
        let experience_entries = self.extract_experience(text);
        let education_entries = self.extract_education(text);
        let total_years_experience = self.total_years(text, &experience_entries);

        let mut profile = ResumeProfile {
            raw_text: text.to_string(),
            contact,
            experience_entries,
            education_entries,
            skills,
            total_years_experience,
            parse_quality: 0,
        };
        profile.parse_quality = self.grade(&profile);

        debug!(
            "built profile: {} skills, {} roles, {} years, quality {}/5",
            profile.skills.len(),
            profile.experience_entries.len(),
            profile.total_years_experience,
            profile.parse_quality
        );
        profile
    }

    fn extract_contact(&self, text: &str) -> ContactInfo {
        let email = self.email_regex.find(text).map(|m| m.as_str().to_string());
        let phone = self.phone_regex.find(text).map(|m| m.as_str().to_string());

        // The name is usually the first short line without contact noise.
        let name = text
            .lines()
            .take(5)
            .map(str::trim)
            .find(|line| {
                !line.is_empty()
                    && line.len() < 60
                    && !line.contains('@')
                    && !line.chars().any(|c| c.is_ascii_digit())
            })
            .map(str::to_string);

        ContactInfo { name, email, phone }
    }

    fn extract_skills(&self, text: &str) -> Vec<String> {
        // Prefer the skills section; fall back to scanning the whole resume.
        let haystack = section_text(text, SKILLS_HEADERS).unwrap_or_else(|| text.to_string());

        let mut skills = Vec::new();
        for mat in self.vocab_matcher.find_iter(&haystack) {
            if !is_word_bounded(&haystack, mat.start(), mat.end()) {
                continue;
            }
            let term = self.vocabulary[mat.pattern()].to_string();
            if !skills.contains(&term) {
                skills.push(term);
            }
        }
        skills
    }

    fn extract_experience(&self, text: &str) -> Vec<ExperienceEntry> {
        let section = section_text(text, EXPERIENCE_HEADERS).unwrap_or_default();
        let mut entries: Vec<ExperienceEntry> = Vec::new();

        for line in section.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let Some(captures) = self.date_range_regex.captures(trimmed) else {
                // Lines between role headers describe the current role.
                if let Some(current) = entries.last_mut() {
                    if !current.description.is_empty() {
                        current.description.push(' ');
                    }
                    current.description.push_str(trimmed);
                }
                continue;
            };

            let years = self.range_years(&captures);
            let before_range = trimmed[..captures.get(0).map_or(0, |m| m.start())]
                .trim_end_matches(['(', ',', '-', '–', ' ']);

            let (title, organization) = match before_range.split_once(" at ") {
                Some((title, org)) => (title.trim().to_string(), Some(org.trim().to_string())),
                None => (before_range.trim().to_string(), None),
            };
            if title.is_empty() {
                continue;
            }

            entries.push(ExperienceEntry {
                title,
                organization,
                years,
                description: String::new(),
            });
        }
        entries
    }

    fn range_years(&self, captures: &regex::Captures<'_>) -> Option<u32> {
        let start: i32 = captures.get(1)?.as_str().parse().ok()?;
        let end_text = captures.get(2)?.as_str();
        let end: i32 = if end_text.eq_ignore_ascii_case("present")
            || end_text.eq_ignore_ascii_case("current")
        {
            chrono::Utc::now().year()
        } else {
            end_text.parse().ok()?
        };
        (end >= start).then_some((end - start) as u32)
    }

    fn extract_education(&self, text: &str) -> Vec<EducationEntry> {
        let section = section_text(text, EDUCATION_HEADERS).unwrap_or_else(|| text.to_string());
        let mut entries = Vec::new();

        for line in section.lines() {
            let Some(mat) = self.degree_regex.find(line) else {
                continue;
            };
            let level = match mat.as_str().to_lowercase().as_str() {
                s if s.starts_with("ph") || s.starts_with("doctor") => EducationLevel::Phd,
                s if s.starts_with("master") || s.starts_with("m.s") || s == "msc" || s == "ms"
                    || s == "mba" =>
                {
                    EducationLevel::Masters
                }
                s if s.starts_with("bachelor") || s.starts_with("b.") || s == "bsc" || s == "bs"
                    || s == "ba" =>
                {
                    EducationLevel::Bachelors
                }
                s if s.starts_with("associate") => EducationLevel::Associates,
                _ => EducationLevel::Diploma,
            };

            // "Bachelor of Science in Computer Science, MIT"
            let rest = &line[mat.end()..];
            let field = rest
                .split_once(" in ")
                .map(|(_, f)| f.split([',', '|', '(']).next().unwrap_or(f).trim().to_string())
                .filter(|f| !f.is_empty());
            let institution = rest
                .rsplit_once(',')
                .map(|(_, inst)| inst.trim().to_string())
                .filter(|i| !i.is_empty());

            entries.push(EducationEntry {
                level,
                field,
                institution,
            });
        }
        entries
    }

    fn total_years(&self, text: &str, entries: &[ExperienceEntry]) -> u32 {
        // A stated total wins over anything derived from date ranges.
        if let Some(captures) = self.total_years_regex.captures(text) {
            if let Ok(years) = captures[1].parse::<u32>() {
                if years <= 50 {
                    return years;
                }
            }
        }
        entries.iter().filter_map(|e| e.years).sum()
    }

    /// 0-5 quality grade: one point each for contact info, recognizable
    /// sections, skills, experience evidence, and reasonable length.
    fn grade(&self, profile: &ResumeProfile) -> u8 {
        let mut quality = 0u8;
        if profile.contact.email.is_some() || profile.contact.phone.is_some() {
            quality += 1;
        }
        let has_sections = [SKILLS_HEADERS, EXPERIENCE_HEADERS, EDUCATION_HEADERS, SUMMARY_HEADERS]
            .iter()
            .any(|headers| section_text(&profile.raw_text, headers).is_some());
        if has_sections {
            quality += 1;
        }
        if !profile.skills.is_empty() {
            quality += 1;
        }
        if !profile.experience_entries.is_empty() || profile.total_years_experience > 0 {
            quality += 1;
        }
        if profile.raw_text.split_whitespace().count() >= MIN_REASONABLE_WORDS {
            quality += 1;
        }
        quality
    }
}

fn invalid_pattern(e: regex::Error) -> ResumeScorerError {
    ResumeScorerError::InvalidInput(format!("Invalid profile pattern: {}", e))
}

/// Body of the first section whose header line matches, up to the next
/// recognized header line or end of text. A header line is a short line
/// that starts with the header text or ends with a colon.
fn section_text(text: &str, headers: &[&str]) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|line| is_header(line, headers))?;

    let all_headers: Vec<&str> = SKILLS_HEADERS
        .iter()
        .chain(EXPERIENCE_HEADERS)
        .chain(EDUCATION_HEADERS)
        .chain(SUMMARY_HEADERS)
        .copied()
        .collect();
    let end = lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| is_header(line, &all_headers))
        .map(|(idx, _)| idx)
        .unwrap_or(lines.len());

    // Anything after the header on the same line belongs to the body.
    let header_line = lines[start];
    let mut body = String::new();
    if let Some((_, tail)) = header_line.split_once(':') {
        if !tail.trim().is_empty() {
            body.push_str(tail.trim());
            body.push('\n');
        }
    }
    for line in &lines[start + 1..end] {
        body.push_str(line);
        body.push('\n');
    }
    Some(body)
}

fn is_header(line: &str, headers: &[&str]) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.len() > 40 {
        return false;
    }
    let lower = trimmed.to_lowercase();
    headers.iter().any(|header| {
        lower == *header
            || lower == format!("{}:", header)
            || (lower.starts_with(header) && trimmed.ends_with(':'))
    })
}
