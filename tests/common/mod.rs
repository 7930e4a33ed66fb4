//! Shared handler fixtures for integration tests.
#![allow(dead_code)]

use route_dispatch::{
    reflect_capability, reflect_newtype, reflect_struct, Actions, Capabilities, Handler, Registry,
};

#[derive(Default)]
pub struct Home;

impl Home {
    fn index(&mut self) -> String {
        "home".to_string()
    }
}

impl Handler for Home {
    fn actions(actions: &mut Actions<Self>) {
        actions.add("Index", Home::index);
    }
}

#[derive(Default)]
pub struct Items;

impl Items {
    fn show(&mut self, id: String) -> String {
        format!("item {id}")
    }

    fn range(&mut self, from: String, to: String) -> String {
        format!("{from}..{to}")
    }
}

impl Handler for Items {
    fn actions(actions: &mut Actions<Self>) {
        actions.add("Show", Items::show).add("Range", Items::range);
    }
}

/// A string-kinded type distinct from `String`.
#[derive(Debug, Clone, PartialEq)]
pub struct Label(pub String);
reflect_newtype!(Label(String));

pub trait Greeting {
    fn greet(&self, name: &str) -> String;
}

#[derive(Debug, Default)]
pub struct English;

#[derive(Debug, Default)]
pub struct French;

impl Greeting for English {
    fn greet(&self, name: &str) -> String {
        format!("hello, {name}")
    }
}

impl Greeting for French {
    fn greet(&self, name: &str) -> String {
        format!("bonjour, {name}")
    }
}

reflect_struct!(English, French);
reflect_capability!(Greeting => English, French);

#[derive(Default)]
pub struct Sample {
    pub calls: u32,
}

impl Sample {
    fn hello(&mut self, greeting: String, name: String) -> String {
        self.calls += 1;
        format!("{greeting}, {name}")
    }

    fn greet(&mut self, greeting: Box<dyn Greeting + Send>, name: String) -> String {
        greeting.greet(&name)
    }

    fn calls(&mut self) -> u32 {
        self.calls
    }
}

impl Handler for Sample {
    fn actions(actions: &mut Actions<Self>) {
        actions
            .add("Hello", Sample::hello)
            .add("Greet", Sample::greet)
            .add("Calls", Sample::calls);
    }
}

/// Framework-owned state pushed into handlers before an action runs.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Session {
    pub user: String,
}

#[derive(Default)]
pub struct Account {
    pub session: Session,
}

impl Account {
    fn whoami(&mut self) -> String {
        self.session.user.clone()
    }
}

impl Handler for Account {
    fn actions(actions: &mut Actions<Self>) {
        actions.add("Whoami", Account::whoami);
    }

    fn capabilities(capabilities: &mut Capabilities<Self>) {
        capabilities.embed(|account| &mut account.session);
    }
}

/// A registry with every fixture handler registered and no routes.
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_handler_template(Home);
    registry.register_handler_template(Items);
    registry.register_handler_template(Sample::default());
    registry.register_handler_template(Account::default());
    registry
}
