use crate::domain::model::{ConnectionSignal, Signals};

/// 提供用戶端環境訊號的來源
pub trait SignalSource: Send + Sync {
    fn user_agent(&self) -> Option<&str>;
    fn connection(&self) -> Option<&ConnectionSignal>;
}

impl SignalSource for Signals {
    fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    fn connection(&self) -> Option<&ConnectionSignal> {
        self.connection.as_ref()
    }
}

impl<S: SignalSource + ?Sized> SignalSource for &S {
    fn user_agent(&self) -> Option<&str> {
        (**self).user_agent()
    }

    fn connection(&self) -> Option<&ConnectionSignal> {
        (**self).connection()
    }
}
