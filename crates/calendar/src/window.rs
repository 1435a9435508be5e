//! Circular calendar windows over day-of-year labels.

use crate::doy::{Doy, N_LABELS};
use crate::error::CalendarError;

/// The set of calendar day labels pooled around a target day.
///
/// Labels are computed modulo 366, so a window centred on January 1 pulls
/// from late-December labels and a window centred on label 366 pulls from
/// early-January labels. The window spans `win_size` consecutive labels
/// starting `win_size / 2` labels before the centre; for even widths the
/// window therefore extends one label further before the centre than after
/// it. A width of 366 or more covers every label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarWindow {
    center: Doy,
    win_size: usize,
    members: [bool; N_LABELS],
    labels: Vec<Doy>,
}

impl CalendarWindow {
    /// Builds the window of `win_size` labels around `center`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidWindow`] if `win_size` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use hwmid_calendar::{CalendarWindow, Doy};
    ///
    /// let window = CalendarWindow::new(Doy::FIRST, 31).unwrap();
    /// assert_eq!(window.len(), 31);
    /// assert!(window.contains(Doy::new(352).unwrap()));
    /// assert!(window.contains(Doy::new(16).unwrap()));
    /// ```
    pub fn new(center: Doy, win_size: usize) -> Result<Self, CalendarError> {
        if win_size == 0 {
            return Err(CalendarError::InvalidWindow { win_size });
        }
        // Wider windows wrap onto labels already covered.
        let span = win_size.min(N_LABELS);
        let plusminus = span / 2;
        let start = usize::from(center.get()) + N_LABELS - plusminus - 1;

        let mut members = [false; N_LABELS];
        for k in 0..span {
            members[(start + k) % N_LABELS] = true;
        }
        let labels = members
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m)
            .map(|(i, _)| Doy::new(i as u16 + 1))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            center,
            win_size,
            members,
            labels,
        })
    }

    /// Returns the label the window was built around.
    pub fn center(&self) -> Doy {
        self.center
    }

    /// Returns the configured window width.
    pub fn win_size(&self) -> usize {
        self.win_size
    }

    /// Returns `true` if `doy` belongs to the window.
    #[inline]
    pub fn contains(&self, doy: Doy) -> bool {
        self.members[doy.index()]
    }

    /// Returns the distinct member labels in ascending order.
    pub fn labels(&self) -> &[Doy] {
        &self.labels
    }

    /// Returns the number of distinct member labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always `false`: a window holds at least its centre.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
