//! Static table of chat app emoji markers
//!
//! Columns: Chinese marker, English marker, emoji. Either marker may be absent
//! when the app only ships one naming scheme for it. Markers without a good
//! emoji candidate are left out and stay untranslated.

pub(crate) static EMOJI_MAP: &[(Option<&str>, Option<&str>, &str)] = &[
    (Some("OK"), Some("OK"), "👌"),
    (Some("耶"), Some("Yeah!"), "✌"),
    (Some("嘘"), Some("Silent"), "🤫"),
    (Some("晕"), Some("Dizzy"), "😲"),
    (Some("衰"), Some("BadLuck"), "😳"),
    (Some("色"), Some("Drool"), "😍"),
    (Some("囧"), Some("Tension"), "☺"),
    (Some("鸡"), Some("Chick"), "🐥"),
    (Some("强"), Some("Thumbs Up"), "👍"),
    (Some("弱"), Some("Weak"), "👎"),
    (Some("睡"), Some("Sleep"), "😴"),
    (Some("吐"), Some("Puke"), "🤢"),
    (Some("困"), Some("Drowsy"), "😪"),
    (Some("發"), Some("Rich"), "🀅"),
    (Some("微笑"), Some("Smile"), "😃"),
    (Some("撇嘴"), Some("Grimace"), "😖"),
    (Some("发呆"), Some("Scowl"), "😳"),
    (Some("得意"), Some("CoolGuy"), "😎"),
    (Some("流泪"), Some("Sob"), "😭"),
    (Some("害羞"), Some("Shy"), "☺"),
    (Some("闭嘴"), Some("Shutup"), "🤐"),
    (Some("大哭"), Some("Cry"), "😣"),
    (Some("尴尬"), Some("Awkward"), "😰"),
    (Some("发怒"), Some("Angry"), "😡"),
    (Some("调皮"), Some("Tongue"), "😜"),
    (Some("呲牙"), Some("Grin"), "😁"),
    (Some("惊讶"), Some("Surprise"), "😱"),
    (Some("难过"), Some("Frown"), "🙁"),
    (Some("抓狂"), Some("Scream"), "😫"),
    (Some("偷笑"), Some("Chuckle"), "😅"),
    (Some("愉快"), Some("Joyful"), "☺"),
    (Some("白眼"), Some("Slight"), "🙄"),
    (Some("傲慢"), Some("Smug"), "😕"),
    (Some("惊恐"), Some("Panic"), "😱"),
    (Some("流汗"), Some("Sweat"), "😓"),
    (Some("憨笑"), Some("Laugh"), "😄"),
    (Some("悠闲"), Some("Loafer"), "😌"),
    (Some("奋斗"), Some("Strive"), "💪"),
    (Some("咒骂"), Some("Scold"), "😤"),
    (Some("疑问"), Some("Doubt"), "❓"),
    (Some("骷髅"), Some("Skull"), "💀"),
    (Some("敲打"), Some("Hammer"), "👊"),
    (Some("捂脸"), Some("Facepalm"), "🤦"),
    (Some("奸笑"), Some("Smirk"), "😏"),
    (Some("皱眉"), Some("Concerned"), "😟"),
    (Some("红包"), Some("Packet"), "🧧"),
    (Some("小狗"), Some("Pup"), "🐶"),
    (Some("再见"), Some("Bye"), "🙋"),
    (Some("擦汗"), Some("Relief"), "😥"),
    (Some("鼓掌"), Some("Clap"), "👏"),
    (Some("坏笑"), Some("Trick"), "👻"),
    (Some("哈欠"), Some("Yawn"), "😪"),
    (Some("鄙视"), Some("Lookdown"), "😒"),
    (Some("委屈"), Some("Wronged"), "😣"),
    (Some("阴险"), Some("Sly"), "😈"),
    (Some("亲亲"), Some("Kiss"), "😘"),
    (Some("菜刀"), Some("Cleaver"), "🔪"),
    (Some("西瓜"), Some("Melon"), "🍉"),
    (Some("啤酒"), Some("Beer"), "🍺"),
    (Some("咖啡"), Some("Coffee"), "☕"),
    (Some("猪头"), Some("Pig"), "🐷"),
    (Some("玫瑰"), Some("Rose"), "🌹"),
    (Some("凋谢"), Some("Wilt"), "🥀"),
    (Some("嘴唇"), Some("Lip"), "💋"),
    (Some("爱心"), Some("Heart"), "❤"),
    (Some("心碎"), Some("BrokenHeart"), "💔"),
    (Some("蛋糕"), Some("Cake"), "🎂"),
    (Some("炸弹"), Some("Bomb"), "💣"),
    (Some("便便"), Some("Poop"), "💩"),
    (Some("月亮"), Some("Moon"), "🌙"),
    (Some("太阳"), Some("Sun"), "🌞"),
    (Some("拥抱"), Some("Hug"), "🤗"),
    (Some("握手"), Some("Shake"), "🤝"),
    (Some("胜利"), Some("Victory"), "✌"),
    (Some("抱拳"), Some("Salute"), "🙏"),
    (Some("拳头"), Some("Fist"), "✊"),
    (Some("怄火"), Some("Aaagh!"), "😡"),
    (Some("蜡烛"), Some("Candle"), "🕯️"),
    (Some("快哭了"), Some("Puling"), "😔"),
    (Some("破涕为笑"), Some("Lol"), "😂"),
    // iOS client only
    (Some("强壮"), None, "💪"),
    (Some("鬼魂"), None, "👻"),
    // Desktop client
    (Some("篮球"), Some("Basketball"), "🏀"),
    (Some("乒乓"), Some("PingPong"), "🏓"),
    (Some("饭"), Some("Rice"), "🍚"),
    (Some("瓢虫"), Some("Ladybug"), "🐞"),
    (Some("礼物"), Some("Gift"), "🎁"),
    (Some("爱你"), Some("Love"), "🤟"),
    (None, Some("NO"), "🙅"),
    (Some("爱情"), Some("InLove"), "💕"),
    (Some("飞吻"), Some("Blowkiss"), "😘"),
    (Some("闪电"), Some("Lightning"), "⚡"),
    (Some("刀"), None, "🔪"),
    (Some("足球"), Some("Soccer"), "⚽"),
    (Some("棒球"), Some("Baseball"), "⚾"),
    (Some("橄榄球"), Some("Football"), "🏈"),
    (Some("钱"), Some("Money"), "💰"),
    (Some("相机"), Some("Camera"), "📷"),
    (Some("干杯"), Some("Cheers"), "🍻"),
    (Some("宝石"), Some("Gem"), "💎"),
    (Some("茶"), Some("Tea"), "🍵"),
    (Some("药丸"), Some("Pill"), "💊"),
    (Some("庆祝"), Some("Party"), "🎆"),
    (Some("火箭"), Some("Rocket ship"), "🚀"),
];
