use super::kinds::{BlockQuote, count_spaces};
use super::types::{ContainerFrame, ListItem};

/// How far a line's prefix satisfies the open container stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerMatch {
    /// Number of frames, outermost first, whose continuation prefix matched.
    pub depth: usize,
    /// Offset just past the matched prefix.
    pub offset: usize,
}

/// The open container stack, innermost last.
#[derive(Debug, Default, Clone)]
pub struct ContainerPath(pub Vec<ContainerFrame>);

impl ContainerPath {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, depth: usize) -> Option<&ContainerFrame> {
        self.0.get(depth)
    }

    pub fn last_mut(&mut self) -> Option<&mut ContainerFrame> {
        self.0.last_mut()
    }

    pub fn push(&mut self, frame: ContainerFrame) {
        self.0.push(frame);
    }

    pub fn pop(&mut self) -> Option<ContainerFrame> {
        self.0.pop()
    }

    /// Records that every open list item now holds content.
    pub fn mark_content(&mut self) {
        for item in self.0.iter_mut().filter_map(ContainerFrame::item_mut) {
            item.mark_content();
        }
    }

    /// Closes every list item that is still empty, after a blank line.
    pub fn close_empty_items(&mut self) {
        for item in self.0.iter_mut().filter_map(ContainerFrame::item_mut) {
            item.close_if_empty();
        }
    }

    /// Walks the stack outer to inner and stops at the first frame the line
    /// does not continue.
    pub fn match_line(&self, text: &str) -> ContainerMatch {
        let mut offset = 0;
        for (depth, frame) in self.0.iter().enumerate() {
            let next = match frame {
                ContainerFrame::BlockQuote => BlockQuote::match_marker(text, offset),
                ContainerFrame::OrderedList { item, .. }
                | ContainerFrame::UnorderedList { item, .. } => continue_item(item, text, offset),
            };
            match next {
                Some(next) => offset = next,
                None => return ContainerMatch { depth, offset },
            }
        }
        ContainerMatch {
            depth: self.0.len(),
            offset,
        }
    }
}

/// A list item continues on any blank line and on a line indented to its
/// content column. A closed item continues on blank lines only.
fn continue_item(item: &ListItem, text: &str, offset: usize) -> Option<usize> {
    let indent = count_spaces(text, offset);
    if offset + indent >= text.len() {
        return Some(offset + indent.min(item.content_indent));
    }
    (!item.closed && indent >= item.content_indent).then_some(offset + item.content_indent)
}
