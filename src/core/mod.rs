mod bus;
mod cookie;
mod event;
mod scoped;
mod subscriber;
mod table;

pub(crate) use self::subscriber::Subscriber;
pub(crate) use self::subscriber::SubscriberId;
pub(crate) use self::table::SubscriberTable;

pub use self::bus::EventBus;
pub use self::cookie::Cookie;
pub use self::event::Event;
pub use self::event::EventRoot;
pub use self::scoped::ScopedSubscription;
