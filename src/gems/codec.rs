//! Protection counter codec.
//!
//! An item's protection charges live in exactly one lore line rendered from the
//! configured template, e.g. `&6&lCharges: %amount%` renders as `§6§lCharges: 3`.
//! The codec finds that line by its fixed prefix, parses the number out of it,
//! and rewrites it in place. All other lore lines are left untouched.
//!
//! Malformed or missing data reads as zero charges; nothing here fails on bad
//! lore. The only fallible operation is [`ProtectionCodec::add_charge`], which
//! refuses to overflow the counter.

use super::errors::GemError;
use super::markup;
use super::types::ItemStack;

/// Placeholder substituted with the charge count.
pub const AMOUNT_PLACEHOLDER: &str = "%amount%";

const COUNT_SEPARATOR: &str = ": ";

/// Reads and writes the charge counter line for one configured template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionCodec {
    /// Normalized text before the placeholder; identifies the counter line.
    prefix: String,
    /// Normalized text after the placeholder (usually empty).
    suffix: String,
    increment: u32,
}

impl ProtectionCodec {
    /// Build a codec from a raw (`&`-coded) template and the per-gem increment.
    pub fn new(template: &str, increment: u32) -> Self {
        let rendered = markup::normalize(template);
        let (prefix, suffix) = match rendered.split_once(AMOUNT_PLACEHOLDER) {
            Some((head, tail)) => (head.to_string(), tail.replace(AMOUNT_PLACEHOLDER, "")),
            None => (rendered.clone(), String::new()),
        };
        Self {
            prefix,
            suffix,
            increment,
        }
    }

    pub fn increment(&self) -> u32 {
        self.increment
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Fully rendered counter line for `count`.
    pub fn render(&self, count: u32) -> String {
        format!("{}{}{}", self.prefix, count, self.suffix)
    }

    fn is_counter_line(&self, line: &str) -> bool {
        markup::normalize(line).starts_with(&self.prefix)
    }

    /// Index of the counter line, if any.
    pub fn find_line(&self, lines: &[String]) -> Option<usize> {
        lines.iter().position(|line| self.is_counter_line(line))
    }

    /// Whether a counter line is present, regardless of its value.
    pub fn has_protection(&self, lines: &[String]) -> bool {
        self.find_line(lines).is_some()
    }

    /// Charges encoded in `lines`; zero when the line is absent or unreadable.
    pub fn read_count(&self, lines: &[String]) -> u32 {
        self.find_line(lines)
            .map(|idx| self.parse_line(&lines[idx]))
            .unwrap_or(0)
    }

    fn parse_line(&self, line: &str) -> u32 {
        let line = markup::normalize(line);
        if let Some((_, tail)) = line.rsplit_once(COUNT_SEPARATOR) {
            if let Ok(count) = tail.trim().parse::<u32>() {
                return count;
            }
        }
        // Templates that style the number or put text after it.
        line.strip_prefix(&self.prefix)
            .and_then(|rest| rest.strip_suffix(&self.suffix))
            .and_then(|slot| slot.trim().parse::<u32>().ok())
            .unwrap_or(0)
    }

    /// Replace the counter line in place, or append one if absent.
    pub fn write_count(&self, lines: &mut Vec<String>, count: u32) {
        let rendered = self.render(count);
        match self.find_line(lines) {
            Some(idx) => lines[idx] = rendered,
            None => lines.push(rendered),
        }
    }

    /// Drop every counter line, keeping the rest in order.
    pub fn remove_counter(&self, lines: &mut Vec<String>) {
        lines.retain(|line| !self.is_counter_line(line));
    }

    /// Add one gem's worth of charges. Returns the new count.
    pub fn add_charge(&self, lines: &mut Vec<String>) -> Result<u32, GemError> {
        let current = self.read_count(lines);
        let next = current
            .checked_add(self.increment)
            .ok_or(GemError::ChargeOverflow {
                current,
                added: self.increment,
            })?;
        self.write_count(lines, next);
        Ok(next)
    }

    /// Spend the charge for surviving one death.
    ///
    /// Stored count `c` becomes `c - 1 - increment`. Zero is written like any
    /// other count. When `c <= 1`, or the result would be negative, the counter
    /// line is removed instead. Returns the charges left (`None` once the line
    /// is gone).
    pub fn consume_one_charge(&self, lines: &mut Vec<String>) -> Option<u32> {
        let current = self.read_count(lines);
        let remaining = if current > 1 {
            (current - 1).checked_sub(self.increment)
        } else {
            None
        };
        match remaining {
            Some(count) => self.write_count(lines, count),
            None => self.remove_counter(lines),
        }
        remaining
    }

    // ------------------------------------------------------------------
    // Item-level helpers. Absent lore reads as empty and is created on write.
    // ------------------------------------------------------------------

    pub fn item_has_protection(&self, item: &ItemStack) -> bool {
        self.has_protection(item.lore_lines())
    }

    pub fn item_charges(&self, item: &ItemStack) -> u32 {
        self.read_count(item.lore_lines())
    }

    pub fn add_item_charge(&self, item: &mut ItemStack) -> Result<u32, GemError> {
        self.add_charge(item.lore_mut())
    }

    pub fn consume_item_charge(&self, item: &mut ItemStack) -> Option<u32> {
        let remaining = self.consume_one_charge(item.lore_mut());
        if item.lore_lines().is_empty() {
            item.lore = None;
        }
        remaining
    }
}
