//! Shared helpers for integration tests
//!
//! Generated workbooks carry formulas without cached results, so values are
//! checked by reading the formulas back with calamine and evaluating them
//! with the small arithmetic evaluator below.

#![allow(dead_code)] // not every test binary uses every helper

use calamine::{Data, Range, Reader, Xlsx};
use quote_forge::params::{RawParams, ReportParams};
use quote_forge::pipeline::{self, Report};
use quote_forge::schema::SchemaVariant;
use quote_forge::style::StyleConfig;
use quote_forge::types::ReportKind;
use std::io::Cursor;

/// Positional export: raw fields 1,2,3,5,7,8,9,10,12,13 are read
pub fn sap_csv(rows: &[(f64, f64, f64)]) -> String {
    let mut csv = String::from(
        "Status,Quote,Sold-to,Customer,Region,Description,Plant,Item,Material,Qty,Price,Currency,Estimated,Margin %\n",
    );
    for (i, (qty, cost, margin)) in rows.iter().enumerate() {
        let price = cost / (1.0 - margin);
        csv.push_str(&format!(
            "A,5000{i},1200,Acme Corp,NA,Widget {i},P1,{item},PN-{i},{qty},{price:.4},USD,{estimated},{pct}\n",
            item = (i + 1) * 10,
            estimated = cost * qty,
            pct = margin * 100.0,
        ));
    }
    csv
}

/// Header-named export with currency formatting
pub fn named_csv(rows: &[(f64, f64, f64)]) -> String {
    let mut csv =
        String::from("Quote#,QuoteDate,Customer,PartNumber,Qty,Price,Extension,Margin%,MatlCode,V,LTA Flag\n");
    for (i, (qty, price, margin)) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "Q-{i},2024-03-0{day},Acme,PN-{i},\"{qty}\",\"${price:.2}\",\"${ext:.2}\",{pct},M{i},Y,N\n",
            day = i + 1,
            ext = price * qty,
            pct = margin * 100.0,
        ));
    }
    csv
}

pub fn params(report: ReportKind, periods: &str, rate: &str) -> ReportParams {
    let raw = RawParams {
        title: "Acme renewal".to_string(),
        filename: "acme".to_string(),
        periods: Some(periods.to_string()),
        rate: Some(rate.to_string()),
    };
    raw.validate(report).unwrap()
}

pub fn render(csv: &str, variant: SchemaVariant, params: ReportParams) -> Report {
    pipeline::generate(csv.as_bytes(), variant, params, StyleConfig::default()).unwrap()
}

/// One worksheet read back from workbook bytes
pub struct Sheet {
    values: Range<Data>,
    formulas: Range<String>,
}

pub fn sheet_names(bytes: &[u8]) -> Vec<String> {
    let workbook = Xlsx::new(Cursor::new(bytes.to_vec())).unwrap();
    workbook.sheet_names().to_vec()
}

impl Sheet {
    pub fn load(bytes: &[u8], name: &str) -> Self {
        let mut workbook = Xlsx::new(Cursor::new(bytes.to_vec())).unwrap();
        let values = workbook.worksheet_range(name).unwrap();
        let formulas = workbook.worksheet_formula(name).unwrap();
        Self { values, formulas }
    }

    /// Formula text with its leading `=`, if the cell holds one
    pub fn formula(&self, a1: &str) -> Option<String> {
        let pos = parse_a1(a1);
        self.formulas
            .get_value(pos)
            .filter(|f| !f.is_empty())
            .map(|f| format!("={}", f.trim_start_matches('=')))
    }

    pub fn text(&self, a1: &str) -> Option<String> {
        match self.values.get_value(parse_a1(a1)) {
            Some(Data::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    /// Nothing written at all: no value, no formula
    pub fn is_empty(&self, a1: &str) -> bool {
        let pos = parse_a1(a1);
        let no_value = matches!(self.values.get_value(pos), None | Some(Data::Empty));
        no_value && self.formula(a1).is_none()
    }

    /// Numeric value of a cell, evaluating formulas recursively
    pub fn eval(&self, a1: &str) -> f64 {
        if let Some(formula) = self.formula(a1) {
            return Evaluator::new(self, &formula[1..]).run();
        }
        match self.values.get_value(parse_a1(a1)) {
            Some(Data::Float(f)) => *f,
            Some(Data::Int(i)) => *i as f64,
            None | Some(Data::Empty) => 0.0,
            Some(other) => panic!("{} is not numeric: {:?}", a1, other),
        }
    }
}

/// `$C$12` → zero-based (row, col)
pub fn parse_a1(a1: &str) -> (u32, u32) {
    let clean: String = a1.chars().filter(|c| *c != '$').collect();
    let split = clean
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or_else(|| panic!("bad reference {}", a1));
    let (letters, digits) = clean.split_at(split);
    let col = letters
        .chars()
        .fold(0u32, |acc, c| acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1));
    let row: u32 = digits.parse().unwrap();
    (row - 1, col - 1)
}

/// Recursive descent over `+ - * / ^`, parentheses, references and SUBTOTAL(9, range)
///
/// Hand-rolled instead of pulling in `xlformula_engine`: that engine has no
/// `$`-anchored references or SUBTOTAL ranges, which every generated formula uses.
struct Evaluator<'a> {
    sheet: &'a Sheet,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Evaluator<'a> {
    fn new(sheet: &'a Sheet, formula: &str) -> Self {
        Self {
            sheet,
            chars: formula.chars().filter(|c| !c.is_whitespace()).collect(),
            pos: 0,
        }
    }

    fn run(mut self) -> f64 {
        let value = self.expr();
        assert_eq!(self.pos, self.chars.len(), "trailing input in formula");
        value
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> f64 {
        let mut value = self.term();
        loop {
            if self.eat('+') {
                value += self.term();
            } else if self.eat('-') {
                value -= self.term();
            } else {
                return value;
            }
        }
    }

    fn term(&mut self) -> f64 {
        let mut value = self.power();
        loop {
            if self.eat('*') {
                value *= self.power();
            } else if self.eat('/') {
                value /= self.power();
            } else {
                return value;
            }
        }
    }

    fn power(&mut self) -> f64 {
        let mut value = self.unary();
        while self.eat('^') {
            value = value.powf(self.unary());
        }
        value
    }

    fn unary(&mut self) -> f64 {
        if self.eat('-') {
            -self.unary()
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> f64 {
        if self.eat('(') {
            let value = self.expr();
            assert!(self.eat(')'), "unbalanced parentheses");
            return value;
        }
        match self.peek() {
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(_) => {
                let word = self.word();
                if word == "SUBTOTAL" {
                    self.subtotal()
                } else {
                    self.sheet.eval(&word)
                }
            }
            None => panic!("unexpected end of formula"),
        }
    }

    fn number(&mut self) -> f64 {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect::<String>().parse().unwrap()
    }

    /// A function name or cell reference
    fn word(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '$') {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn subtotal(&mut self) -> f64 {
        assert!(self.eat('('));
        let function = self.number();
        assert_eq!(function, 9.0, "only SUBTOTAL(9, ...) is supported");
        assert!(self.eat(','));
        let first = parse_a1(&self.word());
        assert!(self.eat(':'));
        let last = parse_a1(&self.word());
        assert!(self.eat(')'));

        let mut sum = 0.0;
        for row in first.0..=last.0 {
            for col in first.1..=last.1 {
                sum += self.sheet.eval(&to_a1(row, col));
            }
        }
        sum
    }
}

fn to_a1(row: u32, col: u32) -> String {
    let mut letters = String::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    format!("{}{}", letters, row + 1)
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} within {}, got {}",
        expected,
        tolerance,
        actual
    );
}
