//! Built-in demo dataset used to seed an empty store.
//!
//! Timestamps are relative to the moment of seeding, so a fresh install
//! always shows "30 minutes ago", "2 hours ago" and so on.

use chrono::{DateTime, Duration, Utc};

use crate::chat::core::ids::{MessageId, RoomId};
use crate::chat::core::message::Message;
use crate::chat::core::room::ChatRoom;
use crate::chat::core::timestamp::truncate_millis;
use crate::chat::storage::codec::ChatSnapshot;

struct DemoRoom {
    id: &'static str,
    title: &'static str,
    preview: &'static str,
    last_message_ago_min: i64,
    created_ago_min: i64,
}

struct DemoMessage {
    id: &'static str,
    room: &'static str,
    is_user: bool,
    ago_min: i64,
    content: &'static str,
}

const ROOMS: [DemoRoom; 3] = [
    DemoRoom {
        id: "demo-1",
        title: "Creative Writing Assistant",
        preview: "That's a fantastic story idea! Let me help you develop it further.",
        last_message_ago_min: 30,
        created_ago_min: 2880,
    },
    DemoRoom {
        id: "demo-2",
        title: "Code Review & Help",
        preview: "Your React component looks good! Here are some optimization suggestions.",
        last_message_ago_min: 120,
        created_ago_min: 1440,
    },
    DemoRoom {
        id: "demo-3",
        title: "Daily Planning",
        preview: "Here's a structured plan for your productive day ahead!",
        last_message_ago_min: 360,
        created_ago_min: 720,
    },
];

const MESSAGES: [DemoMessage; 6] = [
    DemoMessage {
        id: "msg-1",
        room: "demo-1",
        is_user: true,
        ago_min: 45,
        content: "Hi Gemini! I'm working on a sci-fi story about time travel. Can you help me brainstorm some unique plot twists?",
    },
    DemoMessage {
        id: "msg-2",
        room: "demo-1",
        is_user: false,
        ago_min: 30,
        content: "That's a fantastic story idea! Let me help you develop it further. Here are some unique time travel plot twists:\n\n1. The protagonist discovers they're actually preventing their own birth\n2. Time travel creates parallel universes, and they must choose which reality to preserve\n3. They realize they're trapped in a time loop created by their future self\n\nWhich direction interests you most?",
    },
    DemoMessage {
        id: "msg-3",
        room: "demo-2",
        is_user: true,
        ago_min: 150,
        content: "Can you review this React component for performance issues?\n\n```jsx\nconst UserList = ({ users }) => {\n  return (\n    <div>\n      {users.map(user => (\n        <UserCard key={user.id} user={user} />\n      ))}\n    </div>\n  );\n};\n```",
    },
    DemoMessage {
        id: "msg-4",
        room: "demo-2",
        is_user: false,
        ago_min: 120,
        content: "Your React component looks good! Here are some optimization suggestions:\n\n1. **Memoization**: Wrap with React.memo if users prop doesn't change often\n2. **Key optimization**: Your key={user.id} is perfect\n3. **Consider virtualization**: For large lists, use react-window\n4. **Loading states**: Add skeleton components for better UX\n\nThe component follows React best practices well!",
    },
    DemoMessage {
        id: "msg-5",
        room: "demo-3",
        is_user: true,
        ago_min: 390,
        content: "Help me plan a productive day. I have a presentation to prepare, emails to catch up on, and a project deadline tomorrow.",
    },
    DemoMessage {
        id: "msg-6",
        room: "demo-3",
        is_user: false,
        ago_min: 360,
        content: "Here's a structured plan for your productive day ahead!\n\n**Morning (9-11 AM):**\n- Presentation prep (2 hours of focused work)\n- Break every 45 minutes\n\n**Mid-Morning (11-12 PM):**\n- Email catch-up (batch process)\n\n**Afternoon (1-4 PM):**\n- Project work (3 hours with the deadline in mind)\n- Use Pomodoro technique\n\n**Evening:**\n- Final presentation review\n- Prepare for tomorrow\n\nPrioritize the deadline project if you're running behind!",
    },
];

/// Demo rooms relative to `now`.
#[must_use]
pub fn demo_rooms(now: DateTime<Utc>) -> Vec<ChatRoom> {
    let now = truncate_millis(now);
    ROOMS
        .iter()
        .map(|room| ChatRoom {
            id: RoomId::new(room.id),
            title: room.title.to_string(),
            last_message: Some(room.preview.to_string()),
            last_message_time: Some(now - Duration::minutes(room.last_message_ago_min)),
            created_at: now - Duration::minutes(room.created_ago_min),
        })
        .collect()
}

/// Demo messages relative to `now`, in seeding order.
#[must_use]
pub fn demo_messages(now: DateTime<Utc>) -> Vec<Message> {
    let now = truncate_millis(now);
    MESSAGES
        .iter()
        .map(|message| Message {
            id: MessageId::new(message.id),
            content: message.content.to_string(),
            is_user: message.is_user,
            timestamp: now - Duration::minutes(message.ago_min),
            image: None,
            chat_room_id: RoomId::new(message.room),
        })
        .collect()
}

/// The full demo dataset relative to `now`.
#[must_use]
pub fn demo_snapshot(now: DateTime<Utc>) -> ChatSnapshot {
    ChatSnapshot {
        chat_rooms: demo_rooms(now),
        messages: demo_messages(now),
    }
}
