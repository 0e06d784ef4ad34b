use super::state::State;

/// One-flip neighborhood of a state, in ascending bid order.
///
/// Every candidate is an independent copy of `base` with one bid toggled.
/// Infeasible candidates are yielded too, they report
/// [`super::state::INFEASIBLE`] as objective.
pub struct OneFlip<'s, 'a> {
    base: &'s State<'a>,
    next: usize,
}

pub fn one_flip<'s, 'a>(base: &'s State<'a>) -> OneFlip<'s, 'a> {
    OneFlip { base, next: 0 }
}

impl<'s, 'a> Iterator for OneFlip<'s, 'a> {
    type Item = State<'a>;

    fn next(&mut self) -> Option<State<'a>> {
        if self.next >= self.base.ch.num_bids {
            return None;
        }
        let mut candidate = self.base.clone();
        candidate.flip(self.next);
        self.next += 1;
        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.base.ch.num_bids - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for OneFlip<'_, '_> {}
