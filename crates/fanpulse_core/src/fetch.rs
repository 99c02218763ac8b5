/// Phase of one cached read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching,
    Success,
    Error,
}

/// Ticket handed out by [`FetchState::begin`]; only the newest ticket may land.
pub type FetchTicket = u64;

/// Stale-while-revalidate holder for one read.
///
/// Starting a new fetch or failing one never clears `data`: the last good
/// value stays visible until a newer successful result replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    status: FetchStatus,
    data: Option<T>,
    error: Option<String>,
    ticket: FetchTicket,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            status: FetchStatus::Idle,
            data: None,
            error: None,
            ticket: 0,
        }
    }
}

impl<T> FetchState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters `Fetching` and returns the ticket the result must carry.
    pub fn begin(&mut self) -> FetchTicket {
        self.ticket += 1;
        self.status = FetchStatus::Fetching;
        self.ticket
    }

    /// Stores `data` if `ticket` is the newest; older results are dropped.
    pub fn succeed(&mut self, ticket: FetchTicket, data: T) -> bool {
        if ticket != self.ticket {
            return false;
        }
        self.status = FetchStatus::Success;
        self.data = Some(data);
        self.error = None;
        true
    }

    /// Records a failure for `ticket`, keeping the previous data.
    pub fn fail(&mut self, ticket: FetchTicket, reason: impl Into<String>) -> bool {
        if ticket != self.ticket {
            return false;
        }
        self.status = FetchStatus::Error;
        self.error = Some(reason.into());
        true
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }

    /// First load: fetching with nothing to show yet.
    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Fetching && self.data.is_none()
    }

    /// Background refresh while older data stays on screen.
    pub fn is_refreshing(&self) -> bool {
        self.status == FetchStatus::Fetching && self.data.is_some()
    }
}
