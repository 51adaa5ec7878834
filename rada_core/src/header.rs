use std::fmt;

/// Cities the location filter offers
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum City {
    #[default]
    Nairobi,
    Mombasa,
    Kisumu,
    Eldoret,
}

impl City {
    /// Every city, in menu order
    pub const ALL: [City; 4] = [City::Nairobi, City::Mombasa, City::Kisumu, City::Eldoret];

    fn index(self) -> usize {
        self as usize
    }

    /// The city after this one, wrapping around
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            City::Nairobi => "Nairobi",
            City::Mombasa => "Mombasa",
            City::Kisumu => "Kisumu",
            City::Eldoret => "Eldoret",
        };

        write!(f, "{name}")
    }
}

/// Entries in the side drawer
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerEntry {
    Home,
    Highlights,
    Map,
    Profile,
}

impl DrawerEntry {
    /// Every entry, top to bottom
    pub const ALL: [DrawerEntry; 4] = [
        DrawerEntry::Home,
        DrawerEntry::Highlights,
        DrawerEntry::Map,
        DrawerEntry::Profile,
    ];

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            DrawerEntry::Home => "Home",
            DrawerEntry::Highlights => "Highlights",
            DrawerEntry::Map => "Map",
            DrawerEntry::Profile => "Profile",
        }
    }
}

/// Entries in the profile dropdown
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileEntry {
    MyProfile,
    Settings,
    Logout,
}

impl ProfileEntry {
    /// Every entry, top to bottom
    pub const ALL: [ProfileEntry; 3] = [
        ProfileEntry::MyProfile,
        ProfileEntry::Settings,
        ProfileEntry::Logout,
    ];

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            ProfileEntry::MyProfile => "My Profile",
            ProfileEntry::Settings => "Settings",
            ProfileEntry::Logout => "Logout",
        }
    }
}

/// The bar across the top: menu drawer, title, city filter, profile menu.
#[derive(Debug, Clone, Default)]
pub struct HeaderBar {
    drawer_open: bool,
    profile_menu_open: bool,
    city: City,
}

impl HeaderBar {
    /// A closed header with the default city
    pub fn new() -> Self {
        Self::default()
    }

    /// Is the side drawer showing?
    pub fn drawer_open(&self) -> bool {
        self.drawer_open
    }

    /// Is the profile dropdown showing?
    pub fn profile_menu_open(&self) -> bool {
        self.profile_menu_open
    }

    /// The selected city
    pub fn city(&self) -> City {
        self.city
    }

    /// Open the drawer if it's closed and vice versa. Only one menu shows at
    /// a time, so this closes the profile dropdown.
    pub fn toggle_drawer(&mut self) {
        self.drawer_open = !self.drawer_open;
        self.profile_menu_open = false;
    }

    /// Close the drawer
    pub fn close_drawer(&mut self) {
        self.drawer_open = false;
    }

    /// Pick a drawer entry. The drawer closes behind it.
    pub fn choose_drawer_entry(&mut self, entry: DrawerEntry) -> DrawerEntry {
        self.drawer_open = false;
        entry
    }

    /// Open or close the profile dropdown, closing the drawer.
    pub fn toggle_profile_menu(&mut self) {
        self.profile_menu_open = !self.profile_menu_open;
        self.drawer_open = false;
    }

    /// Pick a profile entry. The dropdown closes behind it.
    pub fn choose_profile_entry(&mut self, entry: ProfileEntry) -> ProfileEntry {
        self.profile_menu_open = false;
        entry
    }

    /// Move the city filter along to the next city
    pub fn cycle_city(&mut self) -> City {
        self.city = self.city.next();
        self.city
    }
}
