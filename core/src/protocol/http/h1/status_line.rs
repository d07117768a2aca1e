/*
 * status_line.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Packetfetch, a packetized HTTPS fetcher.
 *
 * Packetfetch is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Packetfetch is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Packetfetch.  If not, see <http://www.gnu.org/licenses/>.
 */

//! First-line tokenizer.
//!
//! A token's role is only known once we know whether the version token has been seen:
//! before it, tokens belong to the command (`GET /path`); right after it, an all-digit token
//! is the status code; after the code, the rest of the line is the status text.

pub const HTTP_VERSION: &str = "HTTP/1.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    BeforeVersion,
    AfterVersion,
    AfterCode,
}

/// Roles assigned to the tokens of the first line. Unset roles are empty / zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub command: String,
    pub version: String,
    pub code: u16,
    pub text: String,
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// `token` as a status code, only if it is entirely decimal digits.
fn status_code(token: &str) -> Option<u16> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

impl StatusLine {
    pub fn parse(line: &str) -> Self {
        let mut out = StatusLine::default();
        let mut phase = Phase::BeforeVersion;
        let mut rest = line;

        loop {
            rest = rest.trim_start_matches(is_blank);
            if rest.is_empty() {
                break;
            }
            if phase == Phase::AfterCode {
                out.text = rest.trim_end_matches(is_blank).to_string();
                break;
            }
            let split = rest.find(is_blank).unwrap_or(rest.len());
            let (token, tail) = rest.split_at(split);

            match phase {
                Phase::BeforeVersion => {
                    if token == HTTP_VERSION {
                        out.version = token.to_string();
                        phase = Phase::AfterVersion;
                    } else {
                        if !out.command.is_empty() {
                            out.command.push(' ');
                        }
                        out.command.push_str(token);
                    }
                }
                Phase::AfterVersion => match status_code(token) {
                    Some(code) => {
                        out.code = code;
                        phase = Phase::AfterCode;
                    }
                    None => {
                        // no code: everything after the version is text
                        out.text = rest.trim_end_matches(is_blank).to_string();
                        break;
                    }
                },
                Phase::AfterCode => {}
            }
            rest = tail;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line() {
        let line = StatusLine::parse("HTTP/1.1 200 OK");
        assert_eq!(line.version, "HTTP/1.1");
        assert_eq!(line.code, 200);
        assert_eq!(line.text, "OK");
        assert_eq!(line.command, "");
    }

    #[test]
    fn multi_word_reason_is_kept_whole() {
        let line = StatusLine::parse("HTTP/1.1 404 Not Found");
        assert_eq!(line.code, 404);
        assert_eq!(line.text, "Not Found");
    }

    #[test]
    fn request_line_tokens_stay_command_until_version() {
        let line = StatusLine::parse("GET /media/abc?format=jpg HTTP/1.1");
        assert_eq!(line.command, "GET /media/abc?format=jpg");
        assert_eq!(line.version, "HTTP/1.1");
        assert_eq!(line.code, 0);
        assert_eq!(line.text, "");
    }

    #[test]
    fn numeric_token_before_version_is_not_a_code() {
        let line = StatusLine::parse("200 HTTP/1.1 OK");
        assert_eq!(line.command, "200");
        assert_eq!(line.code, 0);
        assert_eq!(line.text, "OK");
    }

    #[test]
    fn missing_code_makes_text() {
        let line = StatusLine::parse("HTTP/1.1 OK then");
        assert_eq!(line.code, 0);
        assert_eq!(line.text, "OK then");
    }

    #[test]
    fn code_without_text_and_extra_blanks() {
        let line = StatusLine::parse("  HTTP/1.1   204  ");
        assert_eq!(line.code, 204);
        assert_eq!(line.text, "");
        assert_eq!(line.version, HTTP_VERSION);
    }

    #[test]
    fn other_versions_are_not_recognized() {
        let line = StatusLine::parse("HTTP/1.0 200 OK");
        assert!(line.version.is_empty());
        assert_eq!(line.command, "HTTP/1.0 200 OK");
        assert_eq!(line.code, 0);
    }

    #[test]
    fn code_must_be_all_digits() {
        let line = StatusLine::parse("HTTP/1.1 200abc OK");
        assert_eq!(line.code, 0);
        assert_eq!(line.text, "200abc OK");
        let line = StatusLine::parse("HTTP/1.1 99999 Huge");
        assert_eq!(line.code, 0);
        assert_eq!(line.text, "99999 Huge");
    }

    #[test]
    fn empty_line() {
        assert_eq!(StatusLine::parse(""), StatusLine::default());
    }
}
