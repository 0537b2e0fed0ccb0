//! Names that well-known .NET namespaces and static classes bring into scope.
//!
//! A `using` directive is only judged when something is known about what it
//! imports. The table errs toward inclusion: a name listed here that is
//! also declared elsewhere can only make a directive look used.
//!
//! Namespaces too large to list are open: their tables are examples only,
//! and a directive importing one is never reported.

use phf::{phf_map, phf_set};

static OPEN_NAMESPACES: phf::Set<&'static str> = phf_set! {
    "System",
};

const SYSTEM: &[&str] = &[
    "Action", "Activator", "AppDomain", "ArgumentException", "ArgumentNullException",
    "ArgumentOutOfRangeException", "Array", "Attribute", "BitConverter", "Boolean", "Buffer",
    "Byte", "Char", "Console", "Convert", "DateTime", "DateTimeOffset", "DayOfWeek", "Decimal",
    "Delegate", "Double", "Enum", "Environment", "EventArgs", "Flags", "EventHandler", "Exception",
    "FormatException", "Func", "GC", "Guid", "IComparable", "IDisposable", "IEquatable",
    "IFormatProvider", "Int16", "Int32", "Int64", "IntPtr", "InvalidCastException",
    "InvalidOperationException", "Lazy", "Math", "MathF", "NotImplementedException",
    "NotSupportedException", "Nullable", "NullReferenceException", "Object",
    "ObjectDisposedException", "Obsolete", "OperationCanceledException", "Predicate", "Random",
    "Serializable", "Single", "Span", "ReadOnlySpan", "String", "StringComparison",
    "StringComparer", "StringSplitOptions", "TimeSpan",
    "TimeoutException", "Tuple", "Type", "UInt16", "UInt32", "UInt64", "Uri", "ValueTuple",
    "Version", "WeakReference",
];

const SYSTEM_COLLECTIONS: &[&str] = &[
    "ArrayList", "Hashtable", "ICollection", "IEnumerable", "IEnumerator", "IList", "Queue",
    "Stack",
];

const SYSTEM_COLLECTIONS_GENERIC: &[&str] = &[
    "Comparer", "Dictionary", "EqualityComparer", "HashSet", "ICollection", "IComparer",
    "IDictionary", "IEnumerable", "IEnumerator", "IEqualityComparer", "IList",
    "IReadOnlyCollection", "IReadOnlyDictionary", "IReadOnlyList", "ISet",
    "KeyNotFoundException", "KeyValuePair", "LinkedList", "List", "Queue", "SortedDictionary",
    "SortedList", "SortedSet", "Stack",
];

const SYSTEM_COLLECTIONS_OBJECTMODEL: &[&str] = &[
    "Collection", "ObservableCollection", "ReadOnlyCollection", "ReadOnlyObservableCollection",
];

const SYSTEM_COLLECTIONS_CONCURRENT: &[&str] = &[
    "BlockingCollection", "ConcurrentBag", "ConcurrentDictionary", "ConcurrentQueue",
    "ConcurrentStack",
];

// Extension methods count: `items.Where(...)` is a use of System.Linq.
const SYSTEM_LINQ: &[&str] = &[
    "Aggregate", "All", "Any", "Append", "AsEnumerable", "AsQueryable", "Average", "Cast",
    "Chunk", "Concat", "Contains", "Count", "DefaultIfEmpty", "Distinct", "DistinctBy",
    "ElementAt", "ElementAtOrDefault", "Enumerable", "Except", "ExceptBy", "First",
    "FirstOrDefault", "GroupBy", "GroupJoin", "IGrouping", "ILookup", "IOrderedEnumerable",
    "IQueryable", "Intersect", "IntersectBy", "Join", "Last", "LastOrDefault", "LongCount",
    "Max", "MaxBy", "Min", "MinBy", "OfType", "Order", "OrderBy", "OrderByDescending",
    "OrderDescending", "Prepend", "Queryable", "Reverse", "Select", "SelectMany",
    "SequenceEqual", "Single", "SingleOrDefault", "Skip", "SkipLast", "SkipWhile", "Sum",
    "Take", "TakeLast", "TakeWhile", "ThenBy", "ThenByDescending", "ToArray", "ToDictionary",
    "ToHashSet", "ToList", "ToLookup", "TryGetNonEnumeratedCount", "Union", "UnionBy", "Where",
    "Zip",
];

const SYSTEM_IO: &[&str] = &[
    "BinaryReader", "BinaryWriter", "Directory", "DirectoryInfo", "DirectoryNotFoundException",
    "File", "FileAccess", "FileInfo", "FileMode", "FileNotFoundException", "FileShare",
    "FileStream", "FileSystemWatcher", "IOException", "MemoryStream", "Path", "SearchOption",
    "Stream", "StreamReader", "StreamWriter", "StringReader", "StringWriter", "TextReader",
    "TextWriter",
];

const SYSTEM_TEXT: &[&str] = &["Encoding", "StringBuilder", "UTF8Encoding"];

const SYSTEM_TEXT_REGULAREXPRESSIONS: &[&str] = &[
    "Capture", "Group", "Match", "MatchCollection", "Regex", "RegexOptions",
];

const SYSTEM_TEXT_JSON: &[&str] = &[
    "JsonDocument", "JsonElement", "JsonException", "JsonSerializer", "JsonSerializerOptions",
];

const SYSTEM_THREADING: &[&str] = &[
    "CancellationToken", "CancellationTokenSource", "Interlocked", "Monitor", "Mutex",
    "SemaphoreSlim", "SynchronizationContext", "Thread", "ThreadPool", "Timer", "Volatile",
];

const SYSTEM_THREADING_TASKS: &[&str] = &[
    "Parallel", "Task", "TaskCompletionSource", "TaskFactory", "TaskScheduler", "ValueTask",
];

const SYSTEM_DIAGNOSTICS: &[&str] = &[
    "Conditional", "Debug", "Debugger", "Process", "ProcessStartInfo", "Stopwatch", "Trace",
];

const SYSTEM_COMPONENTMODEL: &[&str] = &[
    "BackgroundWorker", "CancelEventArgs", "Description", "DesignerProperties",
    "INotifyPropertyChanged", "PropertyChangedEventArgs", "PropertyChangedEventHandler",
    "TypeConverter",
];

const SYSTEM_RUNTIME_COMPILERSERVICES: &[&str] = &[
    "CallerMemberName", "CallerFilePath", "CallerLineNumber", "MethodImpl", "MethodImplOptions",
];

const SYSTEM_RUNTIME_INTEROPSERVICES: &[&str] = &[
    "CharSet", "ComVisible", "DllImport", "GCHandle", "Guid", "LayoutKind", "Marshal",
    "MarshalAs", "StructLayout", "UnmanagedType",
];

const SYSTEM_NET_HTTP: &[&str] = &[
    "HttpClient", "HttpContent", "HttpMethod", "HttpRequestMessage", "HttpResponseMessage",
    "StringContent",
];

const SYSTEM_WINDOWS: &[&str] = &[
    "Application", "DependencyObject", "DependencyProperty", "FrameworkElement",
    "HorizontalAlignment", "MessageBox", "MessageBoxButton", "MessageBoxResult", "Point",
    "PropertyMetadata", "Rect", "ResourceDictionary", "RoutedEventArgs", "Size",
    "SizeChangedEventArgs", "Thickness", "UIElement", "VerticalAlignment", "Visibility",
    "Window", "WindowState",
];

const SYSTEM_WINDOWS_CONTROLS: &[&str] = &[
    "Border", "Button", "Canvas", "CheckBox", "ComboBox", "ContentControl", "Control", "Grid",
    "Image", "InkCanvas", "InkCanvasEditingMode", "ItemsControl", "Label", "ListBox", "Panel",
    "ScrollViewer", "Slider", "StackPanel", "TextBlock", "TextBox", "UserControl",
];

const SYSTEM_WINDOWS_INPUT: &[&str] = &[
    "ICommand", "Key", "KeyEventArgs", "Keyboard", "ModifierKeys", "Mouse", "MouseButtonEventArgs",
    "MouseEventArgs", "StylusPoint", "StylusPointCollection", "TouchEventArgs",
];

const SYSTEM_WINDOWS_INK: &[&str] = &["DrawingAttributes", "Stroke", "StrokeCollection"];

const SYSTEM_WINDOWS_MEDIA: &[&str] = &[
    "Brush", "Brushes", "Color", "ColorConverter", "Colors", "DrawingContext", "DrawingVisual",
    "Geometry", "ImageSource", "Pen", "SolidColorBrush", "VisualTreeHelper",
];

const SYSTEM_WINDOWS_MEDIA_IMAGING: &[&str] = &[
    "BitmapFrame", "BitmapImage", "BitmapSource", "PngBitmapEncoder", "RenderTargetBitmap",
];

const SYSTEM_WINDOWS_SHAPES: &[&str] = &["Ellipse", "Line", "Path", "Polygon", "Polyline", "Rectangle", "Shape"];

const SYSTEM_WINDOWS_THREADING: &[&str] = &["Dispatcher", "DispatcherPriority", "DispatcherTimer"];

// `using static System.Math;`
const SYSTEM_MATH: &[&str] = &[
    "Abs", "Acos", "Asin", "Atan", "Atan2", "Ceiling", "Clamp", "Cos", "E", "Exp", "Floor",
    "Log", "Log10", "Max", "Min", "PI", "Pow", "Round", "Sign", "Sin", "Sqrt", "Tan", "Truncate",
];

const SYSTEM_CONSOLE: &[&str] = &["Beep", "Clear", "ReadKey", "ReadLine", "Write", "WriteLine"];

const XUNIT: &[&str] = &["Assert", "Fact", "InlineData", "Theory", "IClassFixture"];

const NUNIT_FRAMEWORK: &[&str] = &[
    "Assert", "SetUp", "TearDown", "Test", "TestCase", "TestFixture", "Is", "Has",
];

const MSTEST: &[&str] = &[
    "Assert", "TestClass", "TestInitialize", "TestCleanup", "TestMethod", "DataRow",
    "DataTestMethod",
];

static BUILTIN_NAMESPACES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "System" => SYSTEM,
    "System.Collections" => SYSTEM_COLLECTIONS,
    "System.Collections.Generic" => SYSTEM_COLLECTIONS_GENERIC,
    "System.Collections.ObjectModel" => SYSTEM_COLLECTIONS_OBJECTMODEL,
    "System.Collections.Concurrent" => SYSTEM_COLLECTIONS_CONCURRENT,
    "System.Linq" => SYSTEM_LINQ,
    "System.IO" => SYSTEM_IO,
    "System.Text" => SYSTEM_TEXT,
    "System.Text.RegularExpressions" => SYSTEM_TEXT_REGULAREXPRESSIONS,
    "System.Text.Json" => SYSTEM_TEXT_JSON,
    "System.Threading" => SYSTEM_THREADING,
    "System.Threading.Tasks" => SYSTEM_THREADING_TASKS,
    "System.Diagnostics" => SYSTEM_DIAGNOSTICS,
    "System.ComponentModel" => SYSTEM_COMPONENTMODEL,
    "System.Runtime.CompilerServices" => SYSTEM_RUNTIME_COMPILERSERVICES,
    "System.Runtime.InteropServices" => SYSTEM_RUNTIME_INTEROPSERVICES,
    "System.Net.Http" => SYSTEM_NET_HTTP,
    "System.Windows" => SYSTEM_WINDOWS,
    "System.Windows.Controls" => SYSTEM_WINDOWS_CONTROLS,
    "System.Windows.Input" => SYSTEM_WINDOWS_INPUT,
    "System.Windows.Ink" => SYSTEM_WINDOWS_INK,
    "System.Windows.Media" => SYSTEM_WINDOWS_MEDIA,
    "System.Windows.Media.Imaging" => SYSTEM_WINDOWS_MEDIA_IMAGING,
    "System.Windows.Shapes" => SYSTEM_WINDOWS_SHAPES,
    "System.Windows.Threading" => SYSTEM_WINDOWS_THREADING,
    "System.Math" => SYSTEM_MATH,
    "System.Console" => SYSTEM_CONSOLE,
    "Xunit" => XUNIT,
    "NUnit.Framework" => NUNIT_FRAMEWORK,
    "Microsoft.VisualStudio.TestTools.UnitTesting" => MSTEST,
};

/// Names a well-known namespace (or static class) provides, if it is known.
pub fn builtin_members(namespace: &str) -> Option<&'static [&'static str]> {
    BUILTIN_NAMESPACES.get(namespace).copied()
}

/// Whether a namespace provides more than any table can list.
pub fn is_open_namespace(namespace: &str) -> bool {
    OPEN_NAMESPACES.contains(namespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_namespaces() {
        assert!(builtin_members("System").unwrap().contains(&"Console"));
        assert!(builtin_members("System.Linq").unwrap().contains(&"Where"));
        assert!(builtin_members("System.Math").unwrap().contains(&"Sqrt"));
        assert!(builtin_members("Whiteboard.Core").is_none());
        // lookups are exact
        assert!(builtin_members("system").is_none());
    }

    #[test]
    fn test_open_namespaces() {
        assert!(is_open_namespace("System"));
        assert!(!is_open_namespace("System.Linq"));
        assert!(builtin_members("System.Linq").unwrap().contains(&"Contains"));
    }
}
